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

use std::os::unix::io::RawFd;

use tracing::{
    debug,
    trace,
    warn
};

use crate::{
    Error,
    Subsystem
};

use crate::event::{
    Address,
    Event,
    QueueRef
};

use crate::handle::{
    HandleOpenStreams,
    SequencerHandle
};

use crate::port::{
    PortDirection,
    PortRange,
    PortType
};

use crate::queue::{
    QueueControl,
    QueueStatus
};

use crate::policy;

// SNDRV_SEQ_MAX_PORTS
const MAX_PORTS: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub name: String,
    pub input_ports: usize,
    pub output_ports: usize,
    pub create_queue: bool
}

impl ClientConfig {
    pub fn new(name: &str, input_ports: usize, output_ports: usize, create_queue: bool)
        -> ClientConfig {
        ClientConfig {
            name: name.to_owned(),
            input_ports: input_ports,
            output_ports: output_ports,
            create_queue: create_queue
        }
    }
}

impl Default for ClientConfig {
    fn default() -> ClientConfig {
        ClientConfig::new("alsa-seq.rs", 1, 1, true)
    }
}

/// A sequencer client with its ports and, optionally, its own queue.
///
/// Input ports are numbered from 0, output ports follow them. Ports and the
/// queue are released when the client is dropped. There is no locking here:
/// callers sharing a client between threads have to serialise access.
pub struct SequencerClient<S: Subsystem = SequencerHandle> {
    subsystem: S,
    queue: QueueRef,

    input_ports: Vec<u8>,
    output_ports: Vec<u8>,
    output_range: Option<PortRange>
}

impl SequencerClient<SequencerHandle> {
    /// Opens a duplex connection to the "default" sequencer and configures it.
    pub fn open(config: &ClientConfig) -> Result<Self, Error> {
        let handle = SequencerHandle::open(&config.name, HandleOpenStreams::Duplex)?;
        SequencerClient::configure(handle, config)
    }
}

impl<S: Subsystem> SequencerClient<S> {
    /// Sets up the queue and ports on an already open connection.
    ///
    /// If any port fails, the ports created before it and the queue are
    /// released before the error is returned.
    pub fn configure(subsystem: S, config: &ClientConfig) -> Result<Self, Error> {
        let count = config.input_ports + config.output_ports;

        if count > MAX_PORTS {
            return Err(Error::PortCount { count: count });
        }

        let mut client = SequencerClient {
            subsystem: subsystem,
            queue: QueueRef::Direct,

            input_ports: Vec::with_capacity(config.input_ports),
            output_ports: Vec::with_capacity(config.output_ports),
            output_range: PortRange::for_outputs(config.input_ports as u8,
                                                 config.output_ports as u8)
        };

        if config.create_queue {
            let queue = client.subsystem.alloc_queue().map_err(Error::QueueAllocation)?;
            client.queue = QueueRef::Queue(queue);
        }

        if let Err(err) = client.create_ports(config) {
            warn!(%err, "releasing {} ports", client.input_ports.len() + client.output_ports.len());
            return Err(err);
        }

        debug!(client = client.client_id(), queue = ?client.queue,
               inputs = ?client.input_ports, outputs = ?client.output_ports,
               "configured sequencer client");

        Ok(client)
    }

    fn create_ports(&mut self, config: &ClientConfig) -> Result<(), Error> {
        for index in 0..config.input_ports {
            let port = self.create_port(PortDirection::Input, index)?;

            if let QueueRef::Queue(queue) = self.queue {
                if let Err(code) = self.subsystem.set_port_timestamping(port, queue) {
                    warn!(port, code, "couldn't enable timestamping");
                }
            }

            self.input_ports.push(port);
        }

        for index in 0..config.output_ports {
            let port = self.create_port(PortDirection::Output, index)?;
            self.output_ports.push(port);
        }

        Ok(())
    }

    fn create_port(&mut self, direction: PortDirection, index: usize) -> Result<u8, Error> {
        self.subsystem.create_port(direction.port_name(), direction.capabilities(),
                                   PortType::Application)
            .map_err(|code| Error::PortCreation {
                index: index,
                direction: direction,
                code: code
            })
    }

    pub fn client_id(&self) -> i32 {
        self.subsystem.client_id()
    }

    pub fn queue(&self) -> QueueRef {
        self.queue
    }

    pub fn input_ports(&self) -> &[u8] {
        &self.input_ports
    }

    pub fn output_ports(&self) -> &[u8] {
        &self.output_ports
    }

    /// `None` if the client has no output ports.
    pub fn output_port_range(&self) -> Option<PortRange> {
        self.output_range
    }

    pub fn start(&mut self) -> bool {
        self.control_queue(QueueControl::Start)
    }

    pub fn stop(&mut self) -> bool {
        self.control_queue(QueueControl::Stop)
    }

    fn control_queue(&mut self, control: QueueControl) -> bool {
        let queue = match self.queue {
            QueueRef::Queue(queue) => queue,
            QueueRef::Direct => return true
        };

        let err = self.subsystem.control_queue(queue, control);
        self.subsystem.drain_output();

        if err < 0 {
            warn!(queue, code = err, ?control, "queue control failed");
        }

        err >= 0
    }

    /// A client without a queue reports a stopped queue at time zero.
    pub fn status(&self) -> Result<QueueStatus, Error> {
        match self.queue {
            QueueRef::Queue(queue) =>
                self.subsystem.queue_status(queue).map_err(Error::QueueStatus),

            QueueRef::Direct => Ok(QueueStatus::stopped())
        }
    }

    /// Subscribes `port` to events from `client:remote_port`.
    pub fn connect_from(&mut self, port: u8, client: u8, remote_port: u8) -> bool {
        let err = self.subsystem.connect_from(port, Address::new(client, remote_port));

        if err != 0 {
            debug!(port, client, remote_port, code = err, "connect_from failed");
        }

        err == 0
    }

    /// Subscribes `client:remote_port` to events from `port`.
    pub fn connect_to(&mut self, port: u8, client: u8, remote_port: u8) -> bool {
        let err = self.subsystem.connect_to(port, Address::new(client, remote_port));

        if err != 0 {
            debug!(port, client, remote_port, code = err, "connect_to failed");
        }

        err == 0
    }

    /// Blocks until an event arrives.
    pub fn receive_event(&mut self) -> Result<Event, Error> {
        let ev = self.subsystem.event_input().map_err(Error::Receive)?;

        trace!(?ev, "received");
        Ok(ev)
    }

    /// Events ready to be read without blocking. Always 0 without a queue.
    pub fn pending_count(&mut self) -> i32 {
        if self.queue.is_direct() {
            return 0;
        }

        self.subsystem.event_input_pending(true)
    }

    /// The first input descriptor, for use in an external poll loop.
    ///
    /// Only one descriptor is surfaced; should the sequencer ever report
    /// several, the rest are dropped.
    pub fn pollable_descriptor(&self) -> Option<RawFd> {
        let fds = self.subsystem.poll_descriptors();

        if fds.len() > 1 {
            warn!(count = fds.len(), "ignoring extra poll descriptors");
        }

        fds.first().cloned()
    }

    /// Sends `ev` directly, after pulling it onto this client's queue and
    /// output ports. Returns the sequencer's result code untouched.
    pub fn send_event(&mut self, mut ev: Event) -> i32 {
        policy::rewrite_queue(&mut ev, self.queue);
        policy::clamp_source_port(&mut ev, self.output_range);
        policy::route_to_subscribers(&mut ev);

        let result = self.subsystem.event_output_direct(&ev);

        trace!(?ev, result, "sent");
        result
    }

    /// Waits until everything sent so far has been processed.
    pub fn flush_output(&mut self) {
        let err = self.subsystem.sync_output_queue();

        if err < 0 {
            debug!(code = err, "sync_output_queue failed");
        }
    }
}

impl<S: Subsystem> Drop for SequencerClient<S> {
    fn drop(&mut self) {
        for &port in self.output_ports.iter().rev().chain(self.input_ports.iter().rev()) {
            self.subsystem.delete_port(port);
        }

        if let QueueRef::Queue(queue) = self.queue {
            self.subsystem.free_queue(queue);
        }
    }
}
