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

use alsa_sys::snd_seq_real_time_t;

/// Seconds plus a nanosecond remainder, as the sequencer keeps real time.
///
/// Converting from `f64` truncates the whole seconds toward zero and derives
/// the remainder by subtraction, rounded to the nearest nanosecond, so a split
/// followed by a combine lands within a nanosecond of where it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RealTime {
    pub sec: u32,
    pub nsec: u32
}

impl RealTime {
    pub fn from_secs_f64(t: f64) -> RealTime {
        let mut sec = t.trunc() as u32;
        let mut nsec = (1.0e9 * (t - t.trunc())).round() as u32;

        if nsec >= 1_000_000_000 {
            sec += 1;
            nsec = 0;
        }

        RealTime {
            sec: sec,
            nsec: nsec
        }
    }

    pub fn as_secs_f64(&self) -> f64 {
        (self.sec as f64) + 1.0e-9 * (self.nsec as f64)
    }

    pub(crate) fn to_raw(&self) -> snd_seq_real_time_t {
        snd_seq_real_time_t {
            tv_sec: self.sec,
            tv_nsec: self.nsec
        }
    }

    pub(crate) fn from_raw(raw: &snd_seq_real_time_t) -> RealTime {
        RealTime {
            sec: raw.tv_sec,
            nsec: raw.tv_nsec
        }
    }
}
