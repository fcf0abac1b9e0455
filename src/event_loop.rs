use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    /// Keep running, but wake up no later than this (next timer deadline).
    WaitAtMost(Duration),
    Quit,
}

/// The single loop that drives the UI thread.
///
/// The loop is the only place that polls the input driver. The handler is
/// called with:
/// - `None` once per iteration before blocking, to fire timers, flush
///   repositions and draw;
/// - `Some(event)` for every input event.
///
/// Blocking never outlasts one frame interval, and is cut shorter when the
/// idle call reports an earlier deadline, so hover timers fire on time.
pub struct EventLoop<D> {
    driver: D,
    frame_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, frame_interval: Duration) -> Self {
        Self {
            driver,
            frame_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    fn poll_timeout(&self, flow: &ControlFlow) -> Duration {
        match flow {
            ControlFlow::WaitAtMost(wait) => (*wait).min(self.frame_interval),
            ControlFlow::Continue | ControlFlow::Quit => self.frame_interval,
        }
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            let flow = handler(&mut self.driver, None)?;
            if let ControlFlow::Quit = flow {
                break;
            }

            let timeout = self.poll_timeout(&flow);
            if self.driver.poll(timeout)? {
                // Drain the burst before the next idle call so a flurry of
                // scroll events costs one reposition.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Scripted {
        events: VecDeque<Event>,
        timeouts: Vec<Duration>,
    }

    impl InputDriver for Scripted {
        fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
            self.timeouts.push(timeout);
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    #[test]
    fn bursts_are_drained_between_idle_calls() {
        let mut driver = Scripted::default();
        for i in 0..3 {
            driver.events.push_back(Event::Resize(i, i));
        }
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(16));
        let mut idle_calls = 0;
        let mut seen = 0;
        event_loop
            .run(|_, event| {
                match event {
                    Some(_) => seen += 1,
                    None => idle_calls += 1,
                }
                Ok(if idle_calls == 2 {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .expect("loop");
        assert_eq!(seen, 3);
        assert_eq!(idle_calls, 2);
    }

    #[test]
    fn deadline_shortens_the_poll() {
        let driver = Scripted::default();
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(16));
        let mut calls = 0;
        event_loop
            .run(|_, _| {
                calls += 1;
                Ok(match calls {
                    1 => ControlFlow::WaitAtMost(Duration::from_millis(5)),
                    2 => ControlFlow::WaitAtMost(Duration::from_millis(500)),
                    _ => ControlFlow::Quit,
                })
            })
            .expect("loop");
        assert_eq!(
            event_loop.driver().timeouts,
            vec![Duration::from_millis(5), Duration::from_millis(16)]
        );
    }
}
