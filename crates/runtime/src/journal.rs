use std::io::{self, Write};

use market_sim::{MarketEvent, MarketSnapshot};
use tracing::warn;

use crate::sink::PresentationSink;

pub const NEWS_JOURNAL_CSV_HEADER: &str = "tick,kind,instrument,price,message\n";

pub struct NewsJournalCsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> NewsJournalCsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        self.writer.write_all(NEWS_JOURNAL_CSV_HEADER.as_bytes())
    }

    pub fn append_event(&mut self, tick: u64, event: &MarketEvent) -> io::Result<()> {
        let instrument = event
            .instrument()
            .map(|instrument| instrument.as_str())
            .unwrap_or_default();
        let price = event.price().map(|price| price.to_string()).unwrap_or_default();
        let message = escape_csv_field(&event.to_string());
        writeln!(
            self.writer,
            "{tick},{},{instrument},{price},{message}",
            event.kind()
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn escape_csv_field(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|ch| matches!(ch, ',' | '"' | '\n' | '\r'));
    if !needs_quotes {
        return value.to_string();
    }

    let escaped = value.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

/// Journals every event and flushes once per snapshot. Write failures are
/// logged, never propagated into the simulation.
pub struct JournalSink<W: Write> {
    journal: NewsJournalCsvWriter<W>,
}

impl<W: Write> JournalSink<W> {
    pub fn new(journal: NewsJournalCsvWriter<W>) -> Self {
        Self { journal }
    }

    pub fn into_inner(self) -> W {
        self.journal.into_inner()
    }
}

impl<W: Write> PresentationSink for JournalSink<W> {
    fn publish_event(&mut self, tick: u64, event: &MarketEvent) {
        if let Err(err) = self.journal.append_event(tick, event) {
            warn!(%err, tick, "failed to append news journal row");
        }
    }

    fn publish_snapshot(&mut self, _snapshot: &MarketSnapshot) {
        if let Err(err) = self.journal.flush() {
            warn!(%err, "failed to flush news journal");
        }
    }
}
