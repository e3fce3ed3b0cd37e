/// `daisy account`
use crate::app::App;
use clap::Subcommand;
use daisy_core::{Credentials, SignUpRequest};

#[derive(Subcommand, Debug, Clone)]
pub enum AccountAction {
    /// Sign in with email and password
    SignIn {
        email: String,

        #[arg(long, env = "DAISY_PASSWORD")]
        password: String,
    },

    /// Create an account and sign in
    SignUp {
        email: String,

        #[arg(long, env = "DAISY_PASSWORD")]
        password: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,
    },

    /// End the current session
    SignOut,

    /// Show who is signed in
    Status,
}

pub async fn run(app: &App, action: AccountAction) -> anyhow::Result<()> {
    match action {
        AccountAction::SignIn { email, password } => {
            app.session
                .sign_in(&Credentials::new(email, password))
                .await?;
            status(app).await;
        }
        AccountAction::SignUp {
            email,
            password,
            first_name,
            last_name,
        } => {
            let request = SignUpRequest {
                email,
                password,
                first_name,
                last_name,
            };
            if app.session.sign_up(&request).await? {
                status(app).await;
            } else {
                println!("Check your email to confirm the account");
            }
        }
        AccountAction::SignOut => {
            app.session.sign_out().await?;
            println!("Signed out");
        }
        AccountAction::Status => status(app).await,
    }
    Ok(())
}

async fn status(app: &App) {
    match app.session.session().await {
        Some(session) => println!("Signed in as {}", session.email),
        None => println!("Not signed in"),
    }
}
