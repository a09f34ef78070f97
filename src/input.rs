//! Line input with a deadline.
//!
//! A blocking `read_line` cannot be interrupted, so reading happens on a
//! dedicated thread that owns the input stream. Each call to
//! [`TimedReader::read_line`] sends a numbered request and waits for the reply
//! with that number. When the wait times out the request is abandoned, but the
//! thread still finishes that read. Its reply then carries an old ticket and
//! is dropped, so a line typed after a timeout never leaks into a later prompt.

use crate::debug_log;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line with its trailing newline removed.
    Line(String),
    TimedOut,
    /// End of input, or the input stream failed.
    Closed,
}

type Reply = (u64, Option<String>);

pub struct TimedReader {
    requests: Sender<u64>,
    replies: Receiver<Reply>,
    next_ticket: u64,
}

impl TimedReader {
    /// Moves `reader` onto a background thread that serves read requests.
    pub fn spawn<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<u64>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();

        thread::spawn(move || {
            let mut reader = reader;
            while let Ok(ticket) = request_rx.recv() {
                let mut buf = Vec::new();
                let result = match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => None,
                    Ok(_) => Some(decode_line(buf)),
                    Err(e) => {
                        log::warn!("Input read failed: {e}");
                        None
                    }
                };
                let closed = result.is_none();
                if reply_tx.send((ticket, result)).is_err() || closed {
                    break;
                }
            }
            debug_log!("TimedReader thread exiting");
        });

        Self {
            requests: request_tx,
            replies: reply_rx,
            next_ticket: 0,
        }
    }

    /// Reads one line, giving up after `timeout` (`None` waits forever).
    ///
    /// A timeout too large to turn into a deadline also waits forever.
    pub fn read_line(&mut self, timeout: Option<Duration>) -> ReadOutcome {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        if self.requests.send(ticket).is_err() {
            return ReadOutcome::Closed;
        }

        // A deadline past what `Instant` can represent means no deadline
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        loop {
            let reply = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    match self.replies.recv_timeout(remaining) {
                        Ok(reply) => reply,
                        Err(RecvTimeoutError::Timeout) => {
                            debug_log!("read_line() - ticket {} timed out", ticket);
                            return ReadOutcome::TimedOut;
                        }
                        Err(RecvTimeoutError::Disconnected) => return ReadOutcome::Closed,
                    }
                }
                None => match self.replies.recv() {
                    Ok(reply) => reply,
                    Err(_) => return ReadOutcome::Closed,
                },
            };

            match reply {
                (t, Some(line)) if t == ticket => return ReadOutcome::Line(line),
                (t, None) if t == ticket => return ReadOutcome::Closed,
                // Input ended while serving an abandoned request
                (t, None) => {
                    debug_log!("read_line() - input closed during stale ticket {}", t);
                    return ReadOutcome::Closed;
                }
                (t, Some(line)) => {
                    debug_log!("read_line() - discarding stale line {:?} (ticket {})", line, t);
                }
            }
        }
    }
}

/// Strips the line ending. A line that is not UTF-8 (a Latin-2 console, for
/// instance) comes back empty, which the game treats as a non-event.
fn decode_line(buf: Vec<u8>) -> String {
    match String::from_utf8(buf) {
        Ok(line) => line.trim_end_matches(['\n', '\r']).to_string(),
        Err(e) => {
            log::warn!("Ignoring input line that is not valid UTF-8: {e}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    /// Delivers its data only after sleeping.
    struct SlowReader {
        delay: Duration,
        data: Cursor<Vec<u8>>,
        waited: bool,
    }

    impl SlowReader {
        fn new(delay: Duration, data: &str) -> Self {
            Self {
                delay,
                data: Cursor::new(data.as_bytes().to_vec()),
                waited: false,
            }
        }
    }

    impl Read for SlowReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.waited {
                thread::sleep(self.delay);
                self.waited = true;
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn test_reads_lines_in_order() {
        let mut reader = TimedReader::spawn(Cursor::new("alma\r\nkörte\n"));
        assert_eq!(reader.read_line(None), ReadOutcome::Line("alma".to_string()));
        assert_eq!(
            reader.read_line(Some(Duration::from_secs(5))),
            ReadOutcome::Line("körte".to_string())
        );
        assert_eq!(reader.read_line(None), ReadOutcome::Closed);
    }

    #[test]
    fn test_line_before_deadline_is_used() {
        let slow = SlowReader::new(Duration::from_millis(20), "alma\n");
        let mut reader = TimedReader::spawn(BufReader::new(slow));
        assert_eq!(
            reader.read_line(Some(Duration::from_secs(5))),
            ReadOutcome::Line("alma".to_string())
        );
    }

    #[test]
    fn test_line_after_deadline_times_out() {
        let slow = SlowReader::new(Duration::from_millis(300), "késő\nkövetkező\n");
        let mut reader = TimedReader::spawn(BufReader::new(slow));
        assert_eq!(
            reader.read_line(Some(Duration::from_millis(30))),
            ReadOutcome::TimedOut
        );
        // The late line belongs to the abandoned request and is dropped
        assert_eq!(
            reader.read_line(None),
            ReadOutcome::Line("következő".to_string())
        );
    }

    #[test]
    fn test_empty_input_is_closed() {
        let mut reader = TimedReader::spawn(Cursor::new(""));
        assert_eq!(reader.read_line(Some(Duration::from_secs(5))), ReadOutcome::Closed);
        assert_eq!(reader.read_line(None), ReadOutcome::Closed);
    }

    #[test]
    fn test_empty_line_is_a_line() {
        let mut reader = TimedReader::spawn(Cursor::new("\n"));
        assert_eq!(reader.read_line(None), ReadOutcome::Line(String::new()));
    }

    #[test]
    fn test_invalid_utf8_line_does_not_close_input() {
        let mut reader = TimedReader::spawn(Cursor::new(b"al\xE1\nalma\n".to_vec()));
        assert_eq!(reader.read_line(None), ReadOutcome::Line(String::new()));
        assert_eq!(
            reader.read_line(Some(Duration::from_secs(5))),
            ReadOutcome::Line("alma".to_string())
        );
        assert_eq!(reader.read_line(None), ReadOutcome::Closed);
    }

    #[test]
    fn test_huge_timeout_waits_without_deadline() {
        let mut reader = TimedReader::spawn(Cursor::new("alma\n"));
        assert_eq!(
            reader.read_line(Some(Duration::from_secs(u64::MAX))),
            ReadOutcome::Line("alma".to_string())
        );
    }
}
