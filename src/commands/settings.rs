// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::models::Theme;
use crate::utils::pretty_table;
use anyhow::{Result, anyhow};

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let state = store.load()?;
            let theme = match state.preferences.theme {
                Theme::Light => "light",
                Theme::Dark => "dark",
            };
            let rows = vec![
                vec!["Profile".to_string(), state.profile.name.clone()],
                vec!["Profile id".to_string(), state.profile.id.clone()],
                vec!["Created".to_string(), state.profile.created_at.clone()],
                vec!["Theme".to_string(), theme.to_string()],
                vec![
                    "Onboarding done".to_string(),
                    state.preferences.mode_chosen.to_string(),
                ],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("theme", sub)) => {
            let theme: Theme = sub.get_one::<String>("theme").unwrap().parse()?;
            let mut state = store.load()?;
            state.preferences.theme = theme;
            store.save(&state)?;
            println!("Theme set to {:?}", theme);
        }
        Some(("profile", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            if name.is_empty() {
                return Err(anyhow!("Profile name must not be empty"));
            }
            let mut state = store.load()?;
            state.profile.name = name.to_string();
            store.save(&state)?;
            println!("Profile renamed to {}", name);
        }
        _ => {}
    }
    Ok(())
}

/// Mark onboarding as finished so startup passes run.
pub fn choose_guest_mode(store: &dyn Store) -> Result<bool> {
    let mut state = store.load()?;
    if state.preferences.mode_chosen {
        return Ok(false);
    }
    state.preferences.mode_chosen = true;
    store.save(&state)?;
    Ok(true)
}
