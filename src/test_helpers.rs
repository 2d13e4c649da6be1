//! Scripted doubles for the AT client and the control port.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use atat::asynch::AtatClient;
use atat::AtatCmd;
use embassy_time::Duration;

use crate::port::ControlPort;

/// AT client double. Every `send` renders the command, records the line
/// and feeds the next canned reply to the command's parser. Commands
/// without a scripted reply get an empty `OK` payload.
#[derive(Clone)]
pub struct MockAt {
    sent: Rc<RefCell<Vec<String>>>,
    replies: Rc<RefCell<VecDeque<Result<Vec<u8>, atat::Error>>>>,
}

impl MockAt {
    pub fn new() -> Self {
        Self {
            sent: Rc::new(RefCell::new(Vec::new())),
            replies: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn reply_ok(&self, payload: &[u8]) {
        self.replies.borrow_mut().push_back(Ok(payload.to_vec()));
    }

    pub fn reply_err(&self, e: atat::Error) {
        self.replies.borrow_mut().push_back(Err(e));
    }

    /// Command lines sent so far, without line termination.
    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }
}

impl AtatClient for MockAt {
    async fn send<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, atat::Error> {
        let mut buf = vec![0u8; Cmd::MAX_LEN];
        let len = cmd.write(&mut buf);
        let line = String::from_utf8_lossy(&buf[..len])
            .trim_end_matches(|c| c == '\r' || c == '\n')
            .to_string();
        self.sent.borrow_mut().push(line);

        match self.replies.borrow_mut().pop_front() {
            Some(Ok(bytes)) => cmd.parse(Ok(&bytes)),
            Some(Err(e)) => Err(e),
            None => cmd.parse(Ok(b"")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortEvent {
    Open,
    Close,
    Flash,
}

/// Control port double with scriptable failures and an event log.
#[derive(Clone, Default)]
pub struct MockPort {
    pub fail_open: bool,
    pub fail_close: bool,
    pub fail_flash: bool,
    events: Rc<RefCell<Vec<PortEvent>>>,
}

impl MockPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PortEvent> {
        self.events.borrow().clone()
    }
}

impl ControlPort for MockPort {
    type Error = ();

    async fn open(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(PortEvent::Open);
        if self.fail_open {
            Err(())
        } else {
            Ok(())
        }
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(PortEvent::Close);
        if self.fail_close {
            Err(())
        } else {
            Ok(())
        }
    }

    async fn flash(&mut self, _duration: Duration) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(PortEvent::Flash);
        if self.fail_flash {
            Err(())
        } else {
            Ok(())
        }
    }
}
