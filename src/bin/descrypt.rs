use descrypt::unix_crypt;

use std::io;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(version, about)]
#[command(infer_subcommands = true)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hash a password
    Generate(GenerateArgs),
    /// Check a password against a hash
    Validate(ValidateArgs),
}

#[derive(Clone, Debug, Args)]
struct GenerateArgs {
    #[arg(long, short)]
    password: Option<String>,
    /// Two characters from [./0-9A-Za-z]; random if omitted
    #[arg(long, short)]
    salt: Option<String>,
}

#[derive(Clone, Debug, Args)]
struct ValidateArgs {
    #[arg(long, short)]
    password: Option<String>,
    hash: String
}

#[allow(deprecated)]
fn generate(GenerateArgs{ password, salt }: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pw = prompt_password(password, true)?;

    let hash = match salt {
	Some(salt) => unix_crypt::hash_with(&salt, pw)?,
	None => unix_crypt::hash(pw)?,
    };
    println!("{}", hash);
    Ok(())
}

fn validate(ValidateArgs{ password, hash }: ValidateArgs) -> io::Result<()> {
    let pw = prompt_password(password, false)?;
    if unix_crypt::verify(pw, &hash) {
	println!("valid");
    } else {
	println!("not valid");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cmd = cli.command.unwrap_or(Commands::Generate(cli.generate));
    match cmd {
	Commands::Generate(args) => generate(args)?,
	Commands::Validate(args) => validate(args)?,
    };
    Ok(())
}

fn prompt_password(password: Option<String>, confirm: bool) -> io::Result<String> {
    match password {
	Some(pw) => Ok(pw),
	None if !confirm => rpassword::prompt_password("Password: "),
	None => loop {
	    let pw = rpassword::prompt_password("Enter new password: ")?;
	    let confirmed = rpassword::prompt_password("Retype new password: ")?;
	    if pw == confirmed {
		return Ok(pw)
	    }
	    println!("Error: Passwords don't match!")
	}
    }
}
