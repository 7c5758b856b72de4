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

use std::fmt;

bitflags! {
    pub struct PortCapabilities: u32 {
        const READ = (1 << 0);
        const WRITE = (1 << 1);
        const SYNC_READ = (1 << 2);
        const SYNC_WRITE = (1 << 3);
        const DUPLEX = (1 << 4);
        const SUBS_READ = (1 << 5);
        const SUBS_WRITE = (1 << 6);
        const NO_EXPORT = (1 << 7);
    }
}

pub const PORT_CAPABILITY_READ: PortCapabilities = PortCapabilities::READ;
pub const PORT_CAPABILITY_WRITE: PortCapabilities = PortCapabilities::WRITE;
pub const PORT_CAPABILITY_SYNC_READ: PortCapabilities = PortCapabilities::SYNC_READ;
pub const PORT_CAPABILITY_SYNC_WRITE: PortCapabilities = PortCapabilities::SYNC_WRITE;
pub const PORT_CAPABILITY_DUPLEX: PortCapabilities = PortCapabilities::DUPLEX;
pub const PORT_CAPABILITY_SUBS_READ: PortCapabilities = PortCapabilities::SUBS_READ;
pub const PORT_CAPABILITY_SUBS_WRITE: PortCapabilities = PortCapabilities::SUBS_WRITE;
pub const PORT_CAPABILITY_NO_EXPORT: PortCapabilities = PortCapabilities::NO_EXPORT;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortType {
    Application = (1 << 20),
    DirectSample = (1 << 11),
    Hardware = (1 << 16),
    MidiGeneric = (1 << 1),
    MidiGM = (1 << 2),
    MidiGM2 = (1 << 6),
    MidiGS = (1 << 3),
    MidiMT32 = (1 << 5),
    MidiXG = (1 << 4),
    Port = (1 << 19),
    Sample = (1 << 12),
    Software = (1 << 17),
    Specific = (1 << 0),
    Synth = (1 << 10),
    Synthesizer = (1 << 18)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output
}

impl PortDirection {
    /// Capabilities a client port needs to be written to (input) or read
    /// from (output) by subscribers.
    pub fn capabilities(self) -> PortCapabilities {
        match self {
            PortDirection::Input => PORT_CAPABILITY_WRITE | PORT_CAPABILITY_SUBS_WRITE,
            PortDirection::Output => PORT_CAPABILITY_READ | PORT_CAPABILITY_SUBS_READ
        }
    }

    pub fn port_name(self) -> &'static str {
        match self {
            PortDirection::Input => "Input port",
            PortDirection::Output => "Output port"
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PortDirection::Input => f.write_str("input"),
            PortDirection::Output => f.write_str("output")
        }
    }
}

/// The span of port numbers outgoing events may claim as their source.
///
/// Input ports are created first, so output ports occupy
/// `[inputs, inputs + outputs - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub first: u8,
    pub last: u8
}

impl PortRange {
    /// `None` when there are no output ports to send from, or when the
    /// ports wouldn't fit in a port number.
    pub fn for_outputs(num_inputs: u8, num_outputs: u8) -> Option<PortRange> {
        if num_outputs == 0 {
            return None;
        }

        num_inputs.checked_add(num_outputs - 1)
            .map(|last| PortRange {
                first: num_inputs,
                last: last
            })
    }

    pub fn clamp(&self, port: u8) -> u8 {
        if port < self.first {
            self.first
        } else if port > self.last {
            self.last
        } else {
            port
        }
    }

    pub fn contains(&self, port: u8) -> bool {
        port >= self.first && port <= self.last
    }
}
