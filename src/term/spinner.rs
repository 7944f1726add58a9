use std::io::{self, Write};
use std::time::Duration;

use crate::proc::Job;

const FRAMES: [char; 4] = ['-', '/', '|', '\\'];
const TICK: Duration = Duration::from_millis(200);

/// Draws a rotating character on stdout until the job exits.
///
/// Returns `Ok(Some(code))` when the job finished, `Ok(None)` if stdout
/// went away (broken pipe) and the indicator was abandoned early. Other
/// I/O errors propagate.
pub async fn spin_while(job: &mut dyn Job) -> io::Result<Option<i32>> {
    let mut tick = 0usize;

    loop {
        if let Some(code) = job.poll_exit()? {
            return Ok(Some(code));
        }

        match draw_frame(FRAMES[tick % FRAMES.len()]) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(None),
            Err(e) => return Err(e),
        }
        tick += 1;

        tokio::time::sleep(TICK).await;
    }
}

fn draw_frame(frame: char) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}\u{8}", frame)?;
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountdownJob {
        polls_left: u32,
        code: i32,
    }

    impl Job for CountdownJob {
        fn poll_exit(&mut self) -> io::Result<Option<i32>> {
            if self.polls_left == 0 {
                Ok(Some(self.code))
            } else {
                self.polls_left -= 1;
                Ok(None)
            }
        }
    }

    struct FailingJob;

    impl Job for FailingJob {
        fn poll_exit(&mut self) -> io::Result<Option<i32>> {
            Err(io::Error::new(io::ErrorKind::Other, "gone"))
        }
    }

    #[tokio::test]
    async fn finishes_when_job_exits() {
        let mut job = CountdownJob { polls_left: 2, code: 0 };
        assert_eq!(spin_while(&mut job).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn finishes_immediately_for_done_job() {
        let mut job = CountdownJob { polls_left: 0, code: 3 };
        assert_eq!(spin_while(&mut job).await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn poll_errors_propagate() {
        let mut job = FailingJob;
        assert!(spin_while(&mut job).await.is_err());
    }
}
