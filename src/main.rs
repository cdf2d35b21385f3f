// SPDX-License-Identifier: GPL-3.0-only

//! VKB console host
//!
//! Reads key presses from standard input, one line per press, and prints what
//! the keyboard asks of its host. A line is either a key name (`shift`,
//! `altgr`, `fn`, `lang`, `alt`, `ctrl`, `pcshift`, `del`, `up`, `down`,
//! `left`, `right`, `done`, `cancel`), a raw key code prefixed with `#`
//! (`#97`, `#-259`) or literal text, which is typed character by character.

use tokio::io::{AsyncBufReadExt, BufReader};
use vkboard::config::{Config, ConfigError};
use vkboard::host::KeyboardHost;
use vkboard::input::{codes, KeyEvent, XkbTranslator};
use vkboard::layout::ActiveLayout;
use vkboard::{app_settings, session, KeyboardController};

/// Host adapter that prints every request to standard output.
#[derive(Debug, Default)]
struct ConsoleHost {
    hidden: bool,
}

impl KeyboardHost for ConsoleHost {
    fn apply_variant(&mut self, layout: &ActiveLayout) {
        println!(
            "layout  {} ({} {})",
            layout.resource, layout.language, layout.variant
        );
    }

    fn request_redraw(&mut self) {
        println!("redraw");
    }

    fn commit_text(&mut self, text: &str) {
        println!("commit  {:?}", text);
    }

    fn emit_key_event(&mut self, event: KeyEvent) {
        let direction = if event.is_down() { "down" } else { "up" };
        println!("key     {} {} [{}]", event.keycode, direction, event.meta);
    }

    fn request_hide(&mut self) {
        self.hidden = true;
        println!("hide");
    }
}

/// Converts an input line into key codes.
fn parse_line(line: &str) -> Vec<i32> {
    let trimmed = line.trim();
    let named = match trimmed.to_ascii_lowercase().as_str() {
        "" => return Vec::new(),
        "shift" => Some(codes::SHIFT),
        "altgr" => Some(codes::ALT),
        "fn" => Some(codes::MODE_CHANGE),
        "lang" => Some(codes::LANGUAGE),
        "alt" => Some(codes::PC_ALT),
        "ctrl" => Some(codes::PC_CTRL),
        "pcshift" => Some(codes::PC_SHIFT),
        "del" => Some(codes::DELETE),
        "up" => Some(codes::ARROW_UP),
        "down" => Some(codes::ARROW_DOWN),
        "left" => Some(codes::ARROW_LEFT),
        "right" => Some(codes::ARROW_RIGHT),
        "done" => Some(codes::DONE),
        "cancel" => Some(codes::CANCEL),
        _ => None,
    };

    if let Some(code) = named {
        return vec![code];
    }
    if let Some(Ok(code)) = trimmed.strip_prefix('#').map(str::parse::<i32>) {
        return vec![code];
    }
    trimmed.chars().map(|c| c as i32).collect()
}

/// Log directive for startup, taken from the config file when it loaded.
fn startup_directive(loaded: &Result<Config, ConfigError>) -> &'static str {
    loaded
        .as_ref()
        .map_or(app_settings::DEFAULT_LOG_DIRECTIVE, Config::log_directive)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // The file is read before logging starts; its fallback is logged after.
    let config_path = Config::default_path();
    let loaded = Config::load(&config_path);

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match startup_directive(&loaded).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = loaded.unwrap_or_else(|err| Config::fallback(&config_path, err));

    let mut controller = KeyboardController::new(ConsoleHost::default(), &config);
    match XkbTranslator::new() {
        Ok(translator) => controller = controller.with_translator(Box::new(translator)),
        Err(err) => tracing::warn!("Using built-in key table: {}", err),
    }
    controller.start();

    let (mut tx, rx) = session::channel(app_settings::EVENT_QUEUE_CAPACITY);

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    tracing::error!("Failed to read standard input: {}", err);
                    break;
                }
            };

            for code in parse_line(&line) {
                if let Err(err) = tx.send(code, Vec::new()).await {
                    tracing::error!("Failed to queue key {}: {}", code, err);
                    return;
                }
            }
        }
    });

    let controller = session::run(controller, rx).await;
    if let Err(err) = reader.await {
        tracing::error!("Input reader stopped: {}", err);
    }

    tracing::info!(
        language = %controller.language(),
        variant = %controller.active_variant(),
        hidden = controller.host().hidden,
        "Session ended"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(parse_line("shift"), vec![codes::SHIFT]);
        assert_eq!(parse_line(" AltGr "), vec![codes::ALT]);
        assert_eq!(parse_line("ctrl"), vec![codes::PC_CTRL]);
        assert_eq!(parse_line("lang"), vec![codes::LANGUAGE]);
    }

    #[test]
    fn test_parse_prefixed_codes_and_text() {
        assert_eq!(parse_line("#-259"), vec![codes::ARROW_UP]);
        assert_eq!(parse_line("#97"), vec![97]);
        assert_eq!(parse_line("hé"), vec![104, 233]);
        assert!(parse_line("   ").is_empty());
    }

    #[test]
    fn test_parse_digits_are_typed_as_text() {
        assert_eq!(parse_line("5"), vec!['5' as i32]);
        assert_eq!(parse_line("-3"), vec!['-' as i32, '3' as i32]);
        assert_eq!(parse_line("#x"), vec!['#' as i32, 'x' as i32]);
    }

    #[test]
    fn test_startup_directive_follows_loaded_config() {
        let debug = Config::from_json(r#"{"debug": true}"#);
        assert_eq!(startup_directive(&debug), app_settings::DEBUG_LOG_DIRECTIVE);

        let broken = Config::from_json("{ bad");
        assert_eq!(startup_directive(&broken), app_settings::DEFAULT_LOG_DIRECTIVE);
    }
}
