//! Tracing initialization.

use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize the tracing subscriber: compact console output, filter from
/// `RUST_LOG` with a development-friendly default.
pub fn init_telemetry() {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "imgconv_api=debug,imgconv_store=debug,imgconv_processing=debug,tower_http=debug"
                        .into()
                }),
        )
        .with(console_fmt)
        .init();
}
