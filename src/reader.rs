use crate::error::{FeedError, FeedResult};
use crate::logging::{log_feed_error, log_record};
use crate::parser::{ParsedLine, RowParser};
use crate::time;
use crate::types::{Record, SubscriptionConfig};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;
use tracing::debug;

/// Streams records out of a feed, one line at a time.
///
/// Blank lines and headers are skipped. An error covers only the offending
/// line; the next call resumes with the line after it.
pub struct FeedReader<R: BufRead> {
    parser: RowParser,
    subscription: SubscriptionConfig,
    lines: Lines<R>,
    current_date: NaiveDate,
    is_live: bool,
    lines_read: usize,
    records_read: usize,
    finished: bool,
}

impl FeedReader<BufReader<File>> {
    /// Open a feed file
    pub fn from_path<P: AsRef<Path>>(
        parser: RowParser,
        subscription: SubscriptionConfig,
        path: P,
    ) -> FeedResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!(path = %path.display(), symbol = %subscription.symbol, "Opened feed file");
        Ok(Self::new(parser, subscription, BufReader::new(file)))
    }
}

impl<R: BufRead> FeedReader<R> {
    pub fn new(parser: RowParser, subscription: SubscriptionConfig, reader: R) -> Self {
        Self {
            parser,
            subscription,
            lines: reader.lines(),
            current_date: time::today(),
            is_live: false,
            lines_read: 0,
            records_read: 0,
            finished: false,
        }
    }

    /// Set the host clock date passed to the parser
    pub fn with_current_date(mut self, date: NaiveDate) -> Self {
        self.current_date = date;
        self
    }

    pub fn with_live_mode(mut self, is_live: bool) -> Self {
        self.is_live = is_live;
        self
    }

    /// Next record, or `None` once the input is exhausted
    pub fn next_record(&mut self) -> FeedResult<Option<Record>> {
        while !self.finished {
            let line = match self.lines.next() {
                Some(Ok(line)) => {
                    self.lines_read += 1;
                    line
                }
                Some(Err(e)) => {
                    self.lines_read += 1;
                    let err = if e.kind() == io::ErrorKind::InvalidData {
                        FeedError::parse("line", format!("line {}", self.lines_read), e.to_string())
                    } else {
                        FeedError::from(e)
                    };
                    log_feed_error(&err, Some(&format!("line {}", self.lines_read)));
                    return Err(err);
                }
                None => {
                    self.finished = true;
                    debug!(
                        symbol = %self.subscription.symbol,
                        lines = self.lines_read,
                        records = self.records_read,
                        "Feed exhausted"
                    );
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let parsed = match self.parser.parse(
                &self.subscription,
                &line,
                self.current_date,
                self.is_live,
            ) {
                Ok(parsed) => parsed,
                Err(e) => {
                    log_feed_error(&e, Some(&format!("line {}", self.lines_read)));
                    return Err(e);
                }
            };

            if let ParsedLine::Data(record) = parsed {
                self.records_read += 1;
                log_record(&record);
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Read every remaining record, stopping at the first error
    pub fn read_all(&mut self) -> FeedResult<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record()? {
            records.push(record);
        }
        Ok(records)
    }

    pub fn parser(&self) -> &RowParser {
        &self.parser
    }

    /// Lines consumed so far, blank lines and headers included
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    pub fn records_read(&self) -> usize {
        self.records_read
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<R: BufRead> Iterator for FeedReader<R> {
    type Item = FeedResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
