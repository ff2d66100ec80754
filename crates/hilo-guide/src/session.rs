//! The interactive read loop: integer pairs in, odds out.

use std::io::{self, BufRead, Write};

use clap::ValueEnum;
use hilo_core::{OutcomeCache, ProbabilityError, Query};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GuideConfig;
use crate::odds::{Pricing, Quote, outcome_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `P: .. -- O: .. -- B: .. -- L: ..` line per outcome.
    Text,
    /// One JSON object per query.
    Json,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single query produced no output. The loop keeps reading.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("deck size and number lower must be non-negative, got {deck_size} {number_lower}")]
    Negative { deck_size: i64, number_lower: i64 },
    #[error("deck size {deck_size} exceeds the configured maximum of {max_deck_size}")]
    DeckTooLarge {
        deck_size: usize,
        max_deck_size: usize,
    },
    #[error(transparent)]
    Probability(#[from] ProbabilityError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub answered: usize,
    pub rejected: usize,
}

#[derive(Debug, Serialize)]
struct QueryReport {
    deck_size: usize,
    number_lower: usize,
    outcomes: Vec<LabelledQuote>,
}

#[derive(Debug, Serialize)]
struct LabelledQuote {
    label: String,
    #[serde(flatten)]
    quote: Quote,
}

pub struct Session {
    pricing: Pricing,
    max_deck_size: usize,
    cache: OutcomeCache,
    format: OutputFormat,
}

impl Session {
    pub fn new(config: &GuideConfig, format: OutputFormat) -> Self {
        Self {
            pricing: Pricing::from_config(&config.pricing),
            max_deck_size: config.limits.max_deck_size,
            cache: OutcomeCache::new(config.cache.capacity),
            format,
        }
    }

    pub fn cache(&self) -> &OutcomeCache {
        &self.cache
    }

    /// Reads whitespace-separated pairs until end of input, the first token
    /// that is not an integer, or the first line that is not UTF-8. Rejected
    /// queries are reported on `errors`; read failures are fatal.
    pub fn run<R, W, E>(
        &mut self,
        input: R,
        mut output: W,
        mut errors: E,
    ) -> Result<SessionSummary, SessionError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let mut summary = SessionSummary::default();
        let mut pending: Option<i64> = None;

        'lines: for bytes in input.split(b'\n') {
            let bytes = bytes.map_err(|source| SessionError::Io {
                context: "reading query",
                source,
            })?;
            let Ok(line) = std::str::from_utf8(&bytes) else {
                debug!(
                    target: "hilo_guide::session",
                    len = bytes.len(),
                    "stopping at input that is not UTF-8"
                );
                break 'lines;
            };

            for token in line.split_whitespace() {
                let Ok(value) = token.parse::<i64>() else {
                    debug!(target: "hilo_guide::session", token, "stopping at malformed input");
                    break 'lines;
                };
                let Some(deck_size) = pending.take() else {
                    pending = Some(value);
                    continue;
                };

                match self.answer(deck_size, value) {
                    Ok((query, quotes)) => {
                        self.write_quotes(&mut output, query, quotes)?;
                        summary.answered += 1;
                    }
                    Err(err) => {
                        warn!(
                            target: "hilo_guide::session",
                            deck_size,
                            number_lower = value,
                            error = %err,
                            "query rejected"
                        );
                        writeln!(errors, "error: {err}").map_err(|source| SessionError::Io {
                            context: "reporting rejected query",
                            source,
                        })?;
                        summary.rejected += 1;
                    }
                }
            }
        }

        output.flush().map_err(|source| SessionError::Io {
            context: "flushing odds",
            source,
        })?;
        Ok(summary)
    }

    /// Computes the quotes for one pair without writing anything.
    pub fn answer(
        &mut self,
        deck_size: i64,
        number_lower: i64,
    ) -> Result<(Query, Vec<Quote>), QueryError> {
        let (Ok(deck), Ok(lower)) = (usize::try_from(deck_size), usize::try_from(number_lower))
        else {
            return Err(QueryError::Negative {
                deck_size,
                number_lower,
            });
        };
        if deck > self.max_deck_size {
            return Err(QueryError::DeckTooLarge {
                deck_size: deck,
                max_deck_size: self.max_deck_size,
            });
        }

        let query = Query::new(deck, lower)?;
        let outcomes = self.cache.get_or_compute(query)?;
        let quotes = outcomes
            .into_iter()
            .map(|fraction| self.pricing.quote(fraction))
            .collect();
        Ok((query, quotes))
    }

    fn write_quotes<W: Write>(
        &self,
        output: &mut W,
        query: Query,
        quotes: Vec<Quote>,
    ) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            context: "writing odds",
            source,
        };

        match self.format {
            OutputFormat::Text => {
                for quote in &quotes {
                    writeln!(output, "{quote}").map_err(io_err)?;
                }
            }
            OutputFormat::Json => {
                let count = quotes.len();
                let report = QueryReport {
                    deck_size: query.deck_size(),
                    number_lower: query.number_lower(),
                    outcomes: quotes
                        .into_iter()
                        .enumerate()
                        .map(|(index, quote)| LabelledQuote {
                            label: outcome_label(index, count),
                            quote,
                        })
                        .collect(),
                };
                serde_json::to_writer(&mut *output, &report)?;
                writeln!(output).map_err(io_err)?;
            }
        }

        output.flush().map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str, format: OutputFormat) -> (SessionSummary, String, String) {
        let mut session = Session::new(&GuideConfig::default(), format);
        let mut output = Vec::new();
        let mut errors = Vec::new();
        let summary = session
            .run(input.as_bytes(), &mut output, &mut errors)
            .expect("session runs");
        (
            summary,
            String::from_utf8(output).expect("utf8"),
            String::from_utf8(errors).expect("utf8"),
        )
    }

    #[test]
    fn prints_one_line_per_outcome() {
        let (summary, output, errors) = run("5 1\n", OutputFormat::Text);
        assert_eq!(summary.answered, 1);
        assert!(errors.is_empty());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("P: 0.800 -- O: 1.250 -- B: "));
    }

    #[test]
    fn pairs_may_span_lines() {
        let (summary, output, _) = run("13\n0 2 0\n", OutputFormat::Text);
        assert_eq!(summary.answered, 2);
        assert_eq!(output.lines().count(), 13);
    }

    #[test]
    fn malformed_token_ends_the_loop() {
        let (summary, output, _) = run("2 0\nquit\n5 0\n", OutputFormat::Text);
        assert_eq!(summary.answered, 1);
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn non_utf8_line_ends_the_loop() {
        let mut session = Session::new(&GuideConfig::default(), OutputFormat::Text);
        let mut output = Vec::new();
        let summary = session
            .run(&b"2 0\n\xff\xfe\n5 0\n"[..], &mut output, io::sink())
            .expect("session ends cleanly");
        assert_eq!(
            summary,
            SessionSummary {
                answered: 1,
                rejected: 0
            }
        );
        assert_eq!(String::from_utf8(output).expect("utf8").lines().count(), 1);
    }

    #[test]
    fn read_failures_stay_fatal() {
        struct FailingReader;

        impl io::Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk gone"))
            }
        }

        let mut session = Session::new(&GuideConfig::default(), OutputFormat::Text);
        let err = session
            .run(io::BufReader::new(FailingReader), io::sink(), io::sink())
            .expect_err("read error surfaces");
        assert!(matches!(
            err,
            SessionError::Io {
                context: "reading query",
                ..
            }
        ));
    }

    #[test]
    fn invalid_queries_are_reported_and_skipped() {
        let (summary, output, errors) = run("14 0 1 0 4 4 -3 1 2 1\n", OutputFormat::Text);
        assert_eq!(summary.rejected, 4);
        assert_eq!(summary.answered, 1);
        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec!["P: 0.500 -- O: 2.000 -- B: 2.04 -- L: 1.96"]
        );
        assert_eq!(errors.lines().count(), 4);
        assert!(errors.contains("exceeds the configured maximum of 13"));
        assert!(errors.contains("non-negative"));
    }

    #[test]
    fn json_reports_label_each_outcome() {
        let (_, output, _) = run("3 0\n", OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(output.trim()).expect("json line");
        assert_eq!(value["deck_size"], 3);
        let outcomes = value["outcomes"].as_array().expect("array");
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0]["label"], "Card 1 or further");
        assert_eq!(outcomes[1]["label"], "Card 2");
        assert_eq!(outcomes[0]["numerator"], 1);
        assert_eq!(outcomes[0]["denominator"], 1);
    }

    #[test]
    fn repeated_queries_come_from_the_cache() {
        let mut session = Session::new(&GuideConfig::default(), OutputFormat::Text);
        session
            .run("13 0 13 0".as_bytes(), io::sink(), io::sink())
            .expect("runs");
        assert_eq!(session.cache().hits(), 1);
        assert_eq!(session.cache().misses(), 1);
    }
}
