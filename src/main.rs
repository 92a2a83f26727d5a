// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wanderly command-line client
//!
//! Signs in (if needed), loads the configured city and prints a summary of
//! its routes and progress as structured logs.

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wanderly_core::{
    config::Config,
    db::FileTokenStore,
    services::{
        companion, ApiClient, ReqwestTransport, RouteTracker, Session, StraightLineDirections,
        WanderlyApi,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(base_url = %config.api_base_url, "Starting Wanderly client");

    let store = Arc::new(FileTokenStore::new(&config.token_file));
    let session = Session::new(store);
    let transport =
        Arc::new(ReqwestTransport::new(config.request_timeout).context("Failed to build HTTP client")?);
    let client = ApiClient::new(transport, session.clone(), &config.api_base_url);
    let api = Arc::new(WanderlyApi::new(client));

    if !session.is_authenticated() {
        let (email, password) = config
            .credentials()
            .context("Not signed in; set WANDERLY_EMAIL and WANDERLY_PASSWORD")?;
        api.login(email, password).await.context("Login failed")?;
    }

    let user = api.me().await.context("Failed to fetch current user")?;
    tracing::info!(email = %user.email, "Signed in");

    let Some(city_id) = config.city_id else {
        tracing::info!("No WANDERLY_CITY_ID set, nothing to load");
        return Ok(());
    };

    let (companion, _device, _requests) = companion::link(16);
    let mut tracker = RouteTracker::new(
        api.clone(),
        Arc::new(StraightLineDirections),
        Arc::new(companion),
        config.travel_type,
    );
    tracker
        .initial_load(city_id)
        .await
        .context("Failed to load city")?;

    for (ordinal, drawable) in tracker.drawables().iter().enumerate() {
        let route_id = drawable.route.id;
        let progress = tracker.progress(route_id);
        tracing::info!(
            route = ordinal + 1,
            %route_id,
            category = %drawable.route.category,
            markers = drawable.marker_count(),
            distance_m = drawable.total_distance.round(),
            travel_time_s = drawable.expected_travel_time.round(),
            complete = drawable.is_complete(),
            status = ?tracker.status(route_id),
            visiting = progress.visiting,
            "Route"
        );
    }

    let completed = tracker.ar_models().iter().filter(|m| m.is_completed()).count();
    tracing::info!(
        completed,
        total = tracker.ar_models().len(),
        "AR challenges"
    );
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wanderly_core=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
