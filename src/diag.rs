use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

// Opt-in parse diagnostics. The converter swallows every malformed input by
// contract, so this sink is the only place those events are visible: each
// load drains its counters into one JSON line. Counting never changes the
// geometry result.

pub(crate) const DROPPED_ELEMENT: &str = "element.dropped";
pub(crate) const UNSUPPORTED_ELEMENT: &str = "element.unsupported";
pub(crate) const UNMATCHED_TRANSFORM: &str = "transform.unmatched";
pub(crate) const REJECTED_PATH_DATA: &str = "path.rejected";
pub(crate) const REJECTED_DOCUMENT: &str = "document.rejected";
pub(crate) const UNREADABLE_SOURCE: &str = "source.unreadable";

#[derive(Clone)]
pub(crate) struct DiagnosticsLog {
    inner: Arc<Mutex<DiagState>>,
}

struct DiagState {
    writer: BufWriter<File>,
    counters: BTreeMap<&'static str, u64>,
}

impl DiagnosticsLog {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(DiagState {
                writer: BufWriter::new(file),
                counters: BTreeMap::new(),
            })),
        })
    }

    pub fn count(&self, key: &'static str) {
        if let Ok(mut state) = self.inner.lock() {
            let entry = state.counters.entry(key).or_insert(0);
            *entry = entry.saturating_add(1);
        }
    }

    // Drains the counters accumulated since the previous summary.
    pub fn emit_summary(&self, context: &str) {
        if let Ok(mut state) = self.inner.lock() {
            let counters = std::mem::take(&mut state.counters);
            let mut counts_json = String::from("{");
            for (idx, (key, value)) in counters.iter().enumerate() {
                if idx > 0 {
                    counts_json.push(',');
                }
                counts_json.push_str(&format!("\"{}\":{}", json_escape(key), value));
            }
            counts_json.push('}');
            let json = format!(
                "{{\"type\":\"diag.summary\",\"context\":\"{}\",\"counts\":{}}}",
                json_escape(context),
                counts_json
            );
            let _ = writeln!(state.writer, "{json}");
            let _ = state.writer.flush();
        }
    }
}

pub(crate) fn json_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_control_characters() {
        assert_eq!(json_escape("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    }

    #[test]
    fn counters_drain_into_a_summary_line() {
        let path = std::env::temp_dir().join("linework_diag_counters_test.jsonl");
        let log = DiagnosticsLog::create(&path).unwrap();
        log.count(DROPPED_ELEMENT);
        log.count(DROPPED_ELEMENT);
        log.count(UNSUPPORTED_ELEMENT);
        log.emit_summary("test");
        log.emit_summary("empty");

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        let first = lines.next().unwrap();
        assert!(first.contains("\"element.dropped\":2"));
        assert!(first.contains("\"element.unsupported\":1"));
        assert!(first.contains("\"context\":\"test\""));
        // The second summary starts from drained (empty) counters.
        assert!(lines.next().unwrap().contains("\"counts\":{}"));
        let _ = std::fs::remove_file(&path);
    }
}
