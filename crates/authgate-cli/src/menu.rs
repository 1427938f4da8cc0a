//! Interactive session menu.

use anyhow::Context;
use dialoguer::{Input, Password, Select};

use authgate_client::SessionDriver;

use crate::output;

const ACTIONS: [&str; 5] = [
    "Register",
    "Log in",
    "Access protected resource",
    "Log out",
    "Quit",
];

/// Runs the menu until the user quits. Request failures are printed and
/// the menu continues; only terminal I/O errors end the loop early.
pub async fn run(session: &mut SessionDriver) -> anyhow::Result<()> {
    let mut last_email: Option<String> = None;

    loop {
        let prompt = if session.has_session() {
            "AuthGate (logged in)"
        } else {
            "AuthGate"
        };
        let choice = Select::new()
            .with_prompt(prompt)
            .items(&ACTIONS)
            .default(0)
            .interact()
            .context("Input error")?;

        match choice {
            0 => {
                let (email, password) = prompt_credentials(last_email.as_deref())?;
                match session.register(&email, &password).await {
                    Ok(message) => output::print_success(&message),
                    Err(e) => output::print_error(&e.user_message()),
                }
                last_email = Some(email);
            }
            1 => {
                let (email, password) = prompt_credentials(last_email.as_deref())?;
                match session.login(&email, &password).await {
                    Ok(()) => output::print_success("Logged in"),
                    Err(e) => output::print_error(&e.user_message()),
                }
                last_email = Some(email);
            }
            2 => match session.access_protected().await {
                Ok(resource) => {
                    output::print_success(&resource.message);
                    output::print_kv("Email", &resource.user.email);
                    output::print_kv("Expires", &resource.user.exp.to_string());
                }
                Err(e) => output::print_error(&e.user_message()),
            },
            3 => match session.logout().await {
                Ok(()) => output::print_success("Logged out"),
                Err(e) => output::print_error(&e.user_message()),
            },
            _ => return Ok(()),
        }
    }
}

fn prompt_credentials(default_email: Option<&str>) -> anyhow::Result<(String, String)> {
    let mut input = Input::<String>::new().with_prompt("Email");
    if let Some(email) = default_email {
        input = input.default(email.to_string());
    }
    let email = input.interact_text().context("Input error")?;

    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .context("Input error")?;

    Ok((email, password))
}
