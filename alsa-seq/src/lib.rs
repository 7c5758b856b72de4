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

//! Client-side bindings for the ALSA sequencer.
//!
//! A [`SequencerClient`] owns one connection to the sequencer, a fixed set of
//! input and output ports and at most one timing queue. Events cross the
//! boundary as the flattened [`Event`] record.

#[macro_use]
extern crate bitflags;

use thiserror::Error;

mod time;
mod event;
mod port;
mod queue;
mod subsystem;
mod handle;
mod policy;
mod client;
mod message;

pub use message::ToSequencerEvent;

pub use time::RealTime;

pub use event::{
    Address,
    ControlData,
    Event,
    EventData,
    EventFamily,
    EventType,
    NoteData,
    QueueRef,

    QUEUE_DIRECT,
    TIME_STAMP_REAL
};

pub use port::{
    PortCapabilities,
    PortDirection,
    PortRange,
    PortType,

    PORT_CAPABILITY_DUPLEX,
    PORT_CAPABILITY_NO_EXPORT,
    PORT_CAPABILITY_READ,
    PORT_CAPABILITY_SUBS_READ,
    PORT_CAPABILITY_SUBS_WRITE,
    PORT_CAPABILITY_SYNC_READ,
    PORT_CAPABILITY_SYNC_WRITE,
    PORT_CAPABILITY_WRITE
};

pub use queue::{
    QueueControl,
    QueueStatus
};

pub use subsystem::Subsystem;

pub use handle::{
    HandleOpenStreams,
    SequencerHandle
};

pub use client::{
    ClientConfig,
    SequencerClient
};

pub mod policies {
    //! The corrections applied to every outgoing event.
    pub use crate::policy::{
        clamp_source_port,
        rewrite_queue,
        route_to_subscribers
    };
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("client name contains an interior NUL byte")]
    InvalidName,

    #[error("couldn't open the sequencer (code {0})")]
    Connection(i32),

    #[error("couldn't allocate a queue (code {0})")]
    QueueAllocation(i32),

    #[error("{count} ports don't fit in a sequencer client")]
    PortCount { count: usize },

    #[error("couldn't create {direction} port {index} (code {code})")]
    PortCreation {
        index: usize,
        direction: PortDirection,
        code: i32
    },

    #[error("couldn't read queue status (code {0})")]
    QueueStatus(i32),

    #[error("event input failed (code {0})")]
    Receive(i32)
}

#[cfg(test)]
mod test;
