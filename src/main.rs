mod app;
mod config;
mod models;
mod providers;
mod services;
mod ui;

use std::io::Read;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use adw::prelude::ApplicationExt;
use relm4::prelude::*;
use tracing_subscriber::EnvFilter;

use app::{App, AppInit};
use config::{AppConfig, FileSettings, API_KEY_ENV, APP_ID, KEYRING_KEY_REF};
use services::{keyring, CompletionClient};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let result = match std::env::args().nth(1).as_deref() {
        Some("--save-api-key") => save_api_key(),
        Some(other) => Err(anyhow::anyhow!(
            "Unknown argument '{}'. Usage: alira [--save-api-key]",
            other
        )),
        None => run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("alira: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = load_config().context("Could not load configuration")?;
    tracing::debug!("Resolved {:?}", config);

    let client =
        CompletionClient::from_config(&config).context("Could not create the HTTP client")?;

    let app = adw::Application::builder().application_id(APP_ID).build();
    app.connect_startup(|_| load_stylesheet());

    RelmApp::from_app(app).run_async::<App>(AppInit { config, client });
    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let settings_path = FileSettings::default_path();
    let settings = FileSettings::load_from(&settings_path)?;

    let env = |name: &str| std::env::var(name).ok();
    let env_has_key = env(API_KEY_ENV).is_some_and(|key| !key.trim().is_empty());
    let keyring_secret = if env_has_key {
        None
    } else {
        keyring::retrieve_blocking(KEYRING_KEY_REF)
    };

    Ok(AppConfig::resolve(settings, env, keyring_secret)?)
}

fn save_api_key() -> Result<()> {
    let mut secret = String::new();
    std::io::stdin()
        .read_to_string(&mut secret)
        .context("Failed to read the API key from stdin")?;
    let secret = secret.trim();
    if secret.is_empty() {
        bail!("No API key given on stdin");
    }

    keyring::store_blocking(KEYRING_KEY_REF, secret)?;
    tracing::info!("Stored API key under key-ref '{}'", KEYRING_KEY_REF);
    println!("API key saved to the keyring");
    Ok(())
}

fn load_stylesheet() {
    let Some(display) = gtk::gdk::Display::default() else {
        tracing::warn!("No display available, skipping stylesheet");
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_string(include_str!("../data/style.css"));
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}
