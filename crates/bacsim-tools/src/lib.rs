use bacsim_core::InboundRequest;
use bacsim_device::{Dispatcher, FeedValue, SimulatorConfig, SourceConfig};
use clap::ValueEnum;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// CLI-friendly selector for the value source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Synthetic,
    Feed,
}

impl SourceArg {
    /// Rewrites `config.source` to this kind, keeping the configured tick
    /// interval when the kind does not change.
    pub fn apply(self, config: &mut SimulatorConfig, feed_path: Option<PathBuf>) {
        let interval_ms = |fallback| match (&config.source, self) {
            (SourceConfig::Synthetic { interval_ms, .. }, Self::Synthetic)
            | (SourceConfig::Feed { interval_ms, .. }, Self::Feed) => *interval_ms,
            _ => fallback,
        };
        config.source = match self {
            Self::Synthetic => SourceConfig::Synthetic {
                interval_ms: interval_ms(bacsim_device::config::DEFAULT_DRIFT_INTERVAL_MS),
                seed: match &config.source {
                    SourceConfig::Synthetic { seed, .. } => *seed,
                    SourceConfig::Feed { .. } => None,
                },
            },
            Self::Feed => SourceConfig::Feed {
                interval_ms: interval_ms(bacsim_device::config::DEFAULT_FEED_INTERVAL_MS),
                path: feed_path.or_else(|| match &config.source {
                    SourceConfig::Feed { path, .. } => path.clone(),
                    SourceConfig::Synthetic { .. } => None,
                }),
            },
        };
    }
}

/// Parses a `field=value` feed assignment. Values are `true`, `false`, or a
/// number.
pub fn parse_assignment(input: &str) -> Result<(String, FeedValue), String> {
    let (field, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{input}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("empty field name in '{input}'"));
    }
    let value = match value.trim() {
        "true" => FeedValue::Bool(true),
        "false" => FeedValue::Bool(false),
        other => other
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(FeedValue::Number)
            .ok_or_else(|| format!("'{other}' is not a finite number or boolean"))?,
    };
    Ok((field.to_string(), value))
}

/// Counters reported when a JSON-lines session ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub requests: u64,
    pub responses: u64,
    pub malformed: u64,
}

/// Serves the request boundary over newline-delimited JSON.
///
/// Each non-blank input line is one [`InboundRequest`]; each produces exactly
/// one output line holding the `Response`, or `null` when there is none or
/// the line could not be decoded. Returns at end of input.
pub async fn serve_json_lines<R, W>(
    dispatcher: &Dispatcher,
    reader: R,
    mut writer: W,
) -> std::io::Result<SessionStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = SessionStats::default();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.requests += 1;
        let response = match serde_json::from_str::<InboundRequest>(line) {
            Ok(request) => dispatcher.handle(&request),
            Err(e) => {
                log::warn!("malformed request line: {e}");
                stats.malformed += 1;
                None
            }
        };
        if response.is_some() {
            stats.responses += 1;
        }
        let mut out = serde_json::to_string(&response).map_err(std::io::Error::other)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::{parse_assignment, serve_json_lines, SessionStats, SourceArg};
    use bacsim_device::{FeedValue, Simulator, SimulatorConfig, SourceConfig};
    use std::path::PathBuf;

    #[test]
    fn parses_numeric_and_boolean_assignments() {
        assert_eq!(
            parse_assignment("level=21.5").unwrap(),
            ("level".to_string(), FeedValue::Number(21.5))
        );
        assert_eq!(
            parse_assignment(" pump = true").unwrap(),
            ("pump".to_string(), FeedValue::Bool(true))
        );
        assert!(parse_assignment("level").is_err());
        assert!(parse_assignment("=1").is_err());
        assert!(parse_assignment("level=warm").is_err());
        assert!(parse_assignment("level=NaN").is_err());
    }

    #[test]
    fn source_override_switches_kind() {
        let mut config = SimulatorConfig::default();
        SourceArg::Feed.apply(&mut config, Some(PathBuf::from("/tmp/state.json")));
        assert_eq!(
            config.source,
            SourceConfig::Feed {
                interval_ms: 333,
                path: Some(PathBuf::from("/tmp/state.json")),
            }
        );
        SourceArg::Synthetic.apply(&mut config, None);
        assert_eq!(
            config.source,
            SourceConfig::Synthetic {
                interval_ms: 2000,
                seed: None,
            }
        );
    }

    #[tokio::test]
    async fn one_output_line_per_request() {
        let sim = Simulator::from_config(&SimulatorConfig::default()).unwrap();
        let input = concat!(
            r#"{"source":{"ip":"10.0.0.5:47808"},"service":{"read_property":{"object_id":{"type":"device","instance":2001},"property_id":"vendor-identifier"}}}"#,
            "\n\n",
            r#"{"source":{"ip":"10.0.0.5:47808"},"service":{"unconfirmed":{"service_choice":8}}}"#,
            "\n",
            "not json\n",
            r#"{"source":{"ip":"10.0.0.5:47808"},"service":{"confirmed":{"service_choice":14}}}"#,
            "\n",
        );
        let mut output = Vec::new();
        let stats = serve_json_lines(sim.dispatcher(), input.as_bytes(), &mut output)
            .await
            .unwrap();
        assert_eq!(
            stats,
            SessionStats {
                requests: 4,
                responses: 2,
                malformed: 1,
            }
        );

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["read_property_ack"]["value"]["unsigned"], 999);
        assert!(lines[1].is_null());
        assert!(lines[2].is_null());
        assert_eq!(lines[3]["error"]["error_code"], "service-request-denied");
        assert_eq!(lines[3]["error"]["service"], "read-property-multiple");
    }
}
