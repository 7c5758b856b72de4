// Copyright (c) 2015 William Light <wrl@illest.net>
// 
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
// 
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
// 
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use crate::event::EventType;
use crate::time::RealTime;

/// Transport commands a client can send to its own queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueControl {
    Start,
    Stop
}

impl QueueControl {
    pub fn event_type(self) -> EventType {
        match self {
            QueueControl::Start => EventType::Start,
            QueueControl::Stop => EventType::Stop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueStatus {
    pub running: bool,

    /// Queue time in seconds.
    pub time: f64,

    /// Events waiting in the queue for their delivery time.
    pub events: i32
}

impl QueueStatus {
    pub fn new(running: bool, time: RealTime, events: i32) -> QueueStatus {
        QueueStatus {
            running: running,
            time: time.as_secs_f64(),
            events: events
        }
    }

    pub fn stopped() -> QueueStatus {
        QueueStatus {
            running: false,
            time: 0.0,
            events: 0
        }
    }
}
