//! Command-line argument parsing

use clap::{ArgAction, CommandFactory, Parser};

#[derive(Parser, Debug)]
#[command(name = "docker-retag")]
#[command(about = "Retag an image on a registry without pulling or pushing layers")]
#[command(version, disable_version_flag = true)]
#[command(override_usage = "docker-retag [flags] <image> <new tag> ...")]
pub struct Args {
    /// Registry username
    #[arg(short = 'u', long = "username", help = "Username for registry")]
    pub username: Option<String>,

    /// Registry password
    #[arg(short = 'p', long = "password", help = "Password for registry")]
    pub password: Option<String>,

    #[arg(
        short = 'P',
        long = "password-stdin",
        help = "Read password from stdin"
    )]
    pub password_stdin: bool,

    #[arg(
        short = 'v',
        long = "version",
        action = ArgAction::Version,
        help = "Print version and exit"
    )]
    #[allow(dead_code)]
    version: Option<bool>,

    /// Source image followed by one or more new references
    #[arg(value_name = "IMAGE")]
    pub images: Vec<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// A source and at least one target were given
    pub fn validate(&self) -> Result<(), String> {
        if self.images.len() < 2 {
            return Err("expected a source image and at least one new tag".to_string());
        }
        Ok(())
    }

    pub fn source(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn targets(&self) -> &[String] {
        self.images.get(1..).unwrap_or(&[])
    }

    pub fn print_usage() {
        let _ = Args::command().print_help();
    }
}
