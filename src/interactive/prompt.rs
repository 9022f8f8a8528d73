//
//  cdek-client
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use console::Term;
use dialoguer::{Confirm, Input, Password};

/// Whether prompts can be shown (stdin and stderr are terminals).
pub fn can_prompt() -> bool {
    Term::stderr().is_term() && console::user_attended_stderr()
}

/// Asks for a line of text, pre-filled with `default` when given.
pub fn prompt_input(message: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(message);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    Ok(input.interact_text()?)
}

/// Asks for a secret without echoing it.
pub fn prompt_password(message: &str) -> Result<String> {
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}

pub fn prompt_confirm_with_default(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}
