use fern::colors::{Color, ColoredLevelConfig};
use log::Level;

/// Initialize leveled, colored logging to stderr.
///
/// The level usually comes from [`crate::config::Settings::log_level`].
/// Returns an error if a logger was already installed for this process.
pub fn init_logging(level: Level) -> anyhow::Result<()> {
	let colors = ColoredLevelConfig::new()
		.error(Color::Red)
		.warn(Color::Yellow)
		.info(Color::Green)
		.debug(Color::BrightBlue)
		.trace(Color::Magenta);

	fern::Dispatch::new()
		.format(move |out, message, record| {
			out.finish(format_args!(
				"{} [{}] {} {}",
				chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
				colors.color(record.level()),
				record.target(),
				message
			))
		})
		.level(level.to_level_filter())
		.chain(std::io::stderr())
		.apply()
		.map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

	Ok(())
}
