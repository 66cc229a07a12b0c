//! User subcommands

use crate::commands::{run, CliResult};
use crate::GlobalArgs;
use clap::{Args, Subcommand};
use ctrgt_core_types::Sensitive;
use ctrgt_engine::{EngineCommand, RegisterRequest};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create an account
    Register(RegisterArgs),
    /// Check a username/password pair
    Login(LoginArgs),
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,

    /// Defaults to "standard"
    #[arg(long)]
    pub group: Option<String>,

    /// Create the account disabled
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,
}

pub fn execute(global: &GlobalArgs, args: UserArgs) -> CliResult {
    match args.command {
        UserCommand::Register(register) => {
            let mut request = RegisterRequest::new(register.username, register.password)
                .with_active(!register.inactive);
            if let Some(group) = register.group {
                request = request.with_group(group);
            }
            run(global, EngineCommand::UserRegister(request))
        }
        UserCommand::Login(login) => run(
            global,
            EngineCommand::UserAuthenticate {
                username: login.username,
                password: Sensitive::from(login.password),
            },
        ),
    }
}
