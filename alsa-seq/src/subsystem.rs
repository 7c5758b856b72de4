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

use crate::event::{
    Address,
    Event
};

use crate::port::{
    PortCapabilities,
    PortType
};

use crate::queue::{
    QueueControl,
    QueueStatus
};

/// The host sequencer, as seen by a client.
///
/// Every call maps onto one libasound sequencer call. Failures come back as
/// the raw negative code; interpreting them is the client's business.
pub trait Subsystem {
    fn client_id(&self) -> i32;

    fn alloc_queue(&mut self) -> Result<u8, i32>;
    fn free_queue(&mut self, queue: u8);

    fn create_port(&mut self, name: &str, capabilities: PortCapabilities, port_type: PortType)
        -> Result<u8, i32>;
    fn delete_port(&mut self, port: u8);

    /// Stamp events arriving on `port` with real time from `queue`.
    fn set_port_timestamping(&mut self, port: u8, queue: u8) -> Result<(), i32>;

    fn control_queue(&mut self, queue: u8, control: QueueControl) -> i32;
    fn queue_status(&self, queue: u8) -> Result<QueueStatus, i32>;

    fn connect_from(&mut self, port: u8, sender: Address) -> i32;
    fn connect_to(&mut self, port: u8, dest: Address) -> i32;

    /// Descriptors that become readable when input is available.
    fn poll_descriptors(&self) -> Vec<RawFd>;

    /// Blocks until an event arrives.
    fn event_input(&mut self) -> Result<Event, i32>;
    fn event_input_pending(&mut self, fetch_sequencer: bool) -> i32;

    /// Sends without going through the output buffer.
    fn event_output_direct(&mut self, ev: &Event) -> i32;

    fn drain_output(&mut self) -> i32;
    fn sync_output_queue(&mut self) -> i32;
}
