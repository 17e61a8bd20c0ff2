use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use inkframe_editor::{InitialConfig, MemoryEngine, MessageSource, RecordingHost, Session};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Script of JSON lines, or "-" for stdin
    pub script: PathBuf,

    /// Query string the editor is mounted with
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Access key the editor would be built with
    #[arg(long)]
    pub access_key: Option<String>,
}

/// Window a scripted message appears to come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Origin {
    #[default]
    Parent,
    #[serde(rename = "self")]
    Window,
    Other,
}

impl From<Origin> for MessageSource {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::Parent => MessageSource::Parent,
            Origin::Window => MessageSource::Window,
            Origin::Other => MessageSource::Other,
        }
    }
}

/// One line of a replay script
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum Step {
    /// `{"from": "parent", "data": {...}}`
    Message {
        #[serde(default)]
        from: Origin,
        data: Value,
    },

    /// `{"user": "text"}`, typed by the local user
    User { user: String },

    /// `{"blur": true}`
    Blur { blur: bool },
}

pub fn replay(args: ReplayArgs) -> Result<()> {
    let script = if args.script.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read script from stdin")?
    } else {
        fs::read_to_string(&args.script)
            .with_context(|| format!("Failed to read script {}", args.script.display()))?
    };

    let steps = parse_script(&script)?;
    let outbound = run(&steps, &args.query, args.access_key.as_deref())?;

    for message in &outbound {
        println!("{}", serde_json::to_string(message)?);
    }

    eprintln!(
        "{} {} steps replayed, {} messages posted",
        "✓".green(),
        steps.len(),
        outbound.len()
    );

    Ok(())
}

/// Parse JSON lines, skipping blank lines and `#` comments
fn parse_script(script: &str) -> Result<Vec<Step>> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str::<Step>(line)
                .with_context(|| format!("Invalid script step on line {}", index + 1))
        })
        .collect()
}

/// Mount a headless editor past its ready delay, play every step and tear
/// down. Returns everything posted to the parent.
fn run(steps: &[Step], query: &str, access_key: Option<&str>) -> Result<Vec<Value>> {
    let host = RecordingHost::embedded();
    let config = InitialConfig::from_query(query, access_key);
    let mut session = Session::mount(config, host.clone(), |options| {
        Ok(MemoryEngine::new(options))
    })
    .context("Failed to mount editor")?;

    session.ready_timer_fired();

    for step in steps {
        match step {
            Step::Message { from, data } => {
                session.handle_message(&MessageSource::from(*from), data);
            }
            Step::User { user } => {
                if !session.engine_mut().type_text(user) {
                    eprintln!("{} typing ignored, editor is read-only", "⚠".yellow());
                }
                session.pump();
            }
            Step::Blur { blur } => {
                if *blur {
                    session.engine_mut().blur();
                    session.pump();
                }
            }
        }
    }

    session.teardown();
    Ok(host.take_posted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn types(messages: &[Value]) -> Vec<&str> {
        messages
            .iter()
            .map(|m| m["type"].as_str().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_parse_script_steps() {
        let steps = parse_script(
            r#"
            # seed the editor
            {"data": {"type": "SET_CONTENT", "content": "<p>Hi</p>"}}
            {"from": "other", "data": {"type": "CLEAR"}}
            {"from": "self", "data": {"type": "FOCUS"}}
            {"user": "typed"}
            {"blur": true}
            "#,
        )
        .unwrap();

        assert_eq!(steps.len(), 5);
        assert_eq!(
            steps[0],
            Step::Message {
                from: Origin::Parent,
                data: json!({ "type": "SET_CONTENT", "content": "<p>Hi</p>" }),
            }
        );
        assert!(matches!(steps[1], Step::Message { from: Origin::Other, .. }));
        assert!(matches!(steps[2], Step::Message { from: Origin::Window, .. }));
        assert_eq!(steps[3], Step::User { user: "typed".to_string() });
        assert_eq!(steps[4], Step::Blur { blur: true });
    }

    #[test]
    fn test_parse_script_reports_line() {
        let err = parse_script("{\"user\": \"a\"}\n\nnot json").unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_run_replays_messages() {
        let steps = parse_script(
            r#"
            {"data": {"type": "INSERT_TEXT", "text": "hello"}}
            {"from": "other", "data": {"type": "CLEAR"}}
            {"data": {"type": "FOCUS"}}
            {"blur": true}
            "#,
        )
        .unwrap();

        let posted = run(&steps, "", None).unwrap();

        assert_eq!(
            types(&posted),
            vec!["EDITOR_READY", "CONTENT_CHANGE", "EDITOR_FOCUS", "EDITOR_BLUR"]
        );
        assert_eq!(posted[1]["content"], "<p>hello</p>");
    }

    #[test]
    fn test_run_local_typing() {
        let steps = parse_script(r#"{"user": "draft"}"#).unwrap();
        let posted = run(&steps, "?content=seed", None).unwrap();

        assert_eq!(types(&posted), vec!["EDITOR_READY", "CONTENT_CHANGE"]);
        assert!(posted[1]["text"].as_str().unwrap().contains("draft"));
    }

    #[test]
    fn test_run_with_acknowledgements() {
        let steps = parse_script(r#"{"data": {"type": "SET_EDITABLE", "editable": false}}"#).unwrap();
        let posted = run(&steps, "?ack=true", None).unwrap();

        assert_eq!(types(&posted), vec!["EDITOR_READY", "COMMAND_EXECUTED"]);
        assert_eq!(posted[1]["command"], "SET_EDITABLE");
    }

    #[test]
    fn test_run_access_denied() {
        let err = run(&[], "?key=wrong", Some("secret")).unwrap_err();
        assert!(err.to_string().contains("Failed to mount editor"));
    }
}
