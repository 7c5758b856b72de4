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

use std::ptr::null_mut;
use std::os::unix::io::RawFd;
use std::ffi;

use libc::{
    c_char,
    c_int,
    c_uint,
    pollfd,
    POLLIN
};

use alsa_sys::*;
use tracing::debug;

use crate::{
    Error,
    Subsystem
};

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

use crate::time::RealTime;

#[repr(C)]
pub enum HandleOpenStreams {
    Output = 1,
    Input = 2,
    Duplex = 3
}

/// An open connection to the ALSA sequencer. Closed on drop.
pub struct SequencerHandle {
    raw_handle: *mut snd_seq_t
}

unsafe impl Send for SequencerHandle {}

impl SequencerHandle {
    pub fn open(name: &str, streams: HandleOpenStreams) -> Result<Self, Error> {
        let cstr = ffi::CString::new(name).map_err(|_| Error::InvalidName)?;

        let mut inst = SequencerHandle {
            raw_handle: null_mut()
        };

        unsafe {
            let err = snd_seq_open(&mut inst.raw_handle, b"default\0".as_ptr() as *const c_char,
                                   streams as c_int, 0);

            if err < 0 {
                return Err(Error::Connection(err));
            }

            let err = snd_seq_set_client_name(inst.raw_handle, cstr.as_ptr());

            if err < 0 {
                return Err(Error::Connection(err));
            }
        }

        debug!(client_name = name, client = inst.client_id(), "opened sequencer");
        Ok(inst)
    }
}

impl Subsystem for SequencerHandle {
    fn client_id(&self) -> i32 {
        unsafe { snd_seq_client_id(self.raw_handle) }
    }

    fn alloc_queue(&mut self) -> Result<u8, i32> {
        match unsafe { snd_seq_alloc_queue(self.raw_handle) } {
            err @ _ if err < 0 => Err(err),
            queue => Ok(queue as u8)
        }
    }

    fn free_queue(&mut self, queue: u8) {
        unsafe {
            snd_seq_free_queue(self.raw_handle, queue as c_int);
        }
    }

    fn create_port(&mut self, name: &str, capabilities: PortCapabilities, port_type: PortType)
        -> Result<u8, i32> {
        let cstr = match ffi::CString::new(name) {
            Ok(cstr) => cstr,
            Err(_) => return Err(-libc::EINVAL)
        };

        unsafe {
            let port_nr = snd_seq_create_simple_port(self.raw_handle, cstr.as_ptr(),
                capabilities.bits() as c_uint, port_type as c_uint);

            if port_nr < 0 {
                Err(port_nr)
            } else {
                Ok(port_nr as u8)
            }
        }
    }

    fn delete_port(&mut self, port: u8) {
        unsafe {
            snd_seq_delete_simple_port(self.raw_handle, port as c_int);
        }
    }

    fn set_port_timestamping(&mut self, port: u8, queue: u8) -> Result<(), i32> {
        unsafe {
            let mut info = null_mut();

            let err = snd_seq_port_info_malloc(&mut info);
            if err < 0 {
                return Err(err);
            }

            let mut err = snd_seq_get_port_info(self.raw_handle, port as c_int, info);

            if err >= 0 {
                snd_seq_port_info_set_timestamping(info, 1);
                snd_seq_port_info_set_timestamp_queue(info, queue as c_int);
                snd_seq_port_info_set_timestamp_real(info, 1);

                err = snd_seq_set_port_info(self.raw_handle, port as c_int, info);
            }

            snd_seq_port_info_free(info);

            if err < 0 {
                Err(err)
            } else {
                Ok(())
            }
        }
    }

    fn control_queue(&mut self, queue: u8, control: QueueControl) -> i32 {
        // snd_seq_start_queue() and friends are macros over this
        unsafe {
            snd_seq_control_queue(self.raw_handle, queue as c_int,
                                  control.event_type().raw() as c_int, 0, null_mut())
        }
    }

    fn queue_status(&self, queue: u8) -> Result<QueueStatus, i32> {
        unsafe {
            let mut status = null_mut();

            let err = snd_seq_queue_status_malloc(&mut status);
            if err < 0 {
                return Err(err);
            }

            let err = snd_seq_get_queue_status(self.raw_handle, queue as c_int, status);

            let result = if err < 0 {
                Err(err)
            } else {
                let time = RealTime::from_raw(&*snd_seq_queue_status_get_real_time(status));

                Ok(QueueStatus::new(
                    snd_seq_queue_status_get_status(status) != 0,
                    time,
                    snd_seq_queue_status_get_events(status) as i32))
            };

            snd_seq_queue_status_free(status);
            result
        }
    }

    fn connect_from(&mut self, port: u8, sender: Address) -> i32 {
        unsafe {
            snd_seq_connect_from(self.raw_handle, port as c_int,
                                 sender.client as c_int, sender.port as c_int)
        }
    }

    fn connect_to(&mut self, port: u8, dest: Address) -> i32 {
        unsafe {
            snd_seq_connect_to(self.raw_handle, port as c_int,
                               dest.client as c_int, dest.port as c_int)
        }
    }

    fn poll_descriptors(&self) -> Vec<RawFd> {
        unsafe {
            let count = snd_seq_poll_descriptors_count(self.raw_handle, POLLIN);
            if count <= 0 {
                return Vec::new();
            }

            let mut fds = vec![pollfd { fd: -1, events: 0, revents: 0 }; count as usize];
            let filled = snd_seq_poll_descriptors(self.raw_handle, fds.as_mut_ptr(),
                                                  count as c_uint, POLLIN);

            fds.truncate(filled.max(0) as usize);
            fds.iter().map(|pfd| pfd.fd).collect()
        }
    }

    fn event_input(&mut self) -> Result<Event, i32> {
        let mut ev: *mut snd_seq_event_t = null_mut();

        unsafe {
            let err = snd_seq_event_input(self.raw_handle, &mut ev);

            if err < 0 {
                return Err(err);
            }

            if ev.is_null() {
                return Err(-libc::EAGAIN);
            }

            Ok(Event::from_snd_seq_event(&*ev))
        }
    }

    fn event_input_pending(&mut self, fetch_sequencer: bool) -> i32 {
        unsafe {
            snd_seq_event_input_pending(self.raw_handle, fetch_sequencer as c_int)
        }
    }

    fn event_output_direct(&mut self, ev: &Event) -> i32 {
        let mut raw = ev.to_snd_seq_event();

        unsafe {
            snd_seq_event_output_direct(self.raw_handle, &mut raw)
        }
    }

    fn drain_output(&mut self) -> i32 {
        unsafe {
            snd_seq_drain_output(self.raw_handle)
        }
    }

    fn sync_output_queue(&mut self) -> i32 {
        unsafe {
            snd_seq_sync_output_queue(self.raw_handle)
        }
    }
}

impl Drop for SequencerHandle {
    fn drop(&mut self) {
        if self.raw_handle.is_null() {
            return;
        }

        unsafe {
            snd_seq_close(self.raw_handle);
        }
    }
}
