// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod api;
mod app;
mod boundary;
mod client;
mod command;
mod config;
mod deletion;
mod error;
mod http;
mod input;
mod metadata;
mod notify;
mod password;
mod remote;
mod route;
mod session;
mod shell;
mod storage;
mod view;

use std::{num::NonZeroU64, path::PathBuf, process, sync::Arc, time::Duration};

use clap::Parser;
use error::Result;
use log::error;
use url::Url;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The base URL of the library portal backend.
    #[arg(long, env = "LIBPORTAL_URL", default_value = "http://127.0.0.1:5000/", value_parser = Url::parse)]
    url: Url,

    /// How long notifications stay visible, in milliseconds. Use 0 to keep
    /// them until they are dismissed.
    #[arg(long, env = "LIBPORTAL_NOTIFICATION_DURATION_MS", default_value_t = 3000)]
    notification_duration_ms: u64,

    /// How long to wait for the backend before giving up on a request.
    #[arg(long, env = "LIBPORTAL_REQUEST_TIMEOUT_SECS", default_value = "30")]
    request_timeout_secs: NonZeroU64,

    /// The reason sent along with account deletion requests.
    #[arg(long, env = "LIBPORTAL_DELETION_REASON", default_value = config::DEFAULT_DELETION_REASON)]
    deletion_reason: String,

    /// The shortest password accepted when changing passwords.
    #[arg(long, default_value_t = config::DEFAULT_MIN_PASSWORD_LENGTH)]
    min_password_length: usize,

    /// The path to the Pinentry program to use when asking for passwords.
    #[arg(long, value_hint = clap::ValueHint::ExecutablePath)]
    pinentry_program: Option<PathBuf>,
}

async fn run(args: Args) -> Result<()> {
    let config = config::ConfigBuilder::new(args.url)
        .with_notification_duration(Duration::from_millis(args.notification_duration_ms))
        .with_request_timeout(Duration::from_secs(args.request_timeout_secs.get()))
        .with_deletion_reason(&args.deletion_reason)
        .with_min_password_length(args.min_password_length)
        .into_config()?;

    let prompt: Vec<Box<dyn password::Prompt>> = vec![
        Box::new(args.pinentry_program.map_or_else(
            password::PinentryPrompt::new,
            password::PinentryPrompt::new_with_executable,
        )),
        Box::new(password::RpasswordPrompt),
    ];

    let portal = remote::Portal::new(http::Http::new(&config)?);
    let mut app = app::App::new(
        config,
        Arc::new(portal),
        session::Store::new(storage::Memory::new()),
        Arc::new(prompt),
        Box::new(input::Stdin::new()),
    );

    shell::run(&mut app).await
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("LIBPORTAL_LOG", "warn")
        .write_style("LIBPORTAL_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
