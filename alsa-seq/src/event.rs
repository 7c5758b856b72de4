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

use std::mem;

use libc::{
    c_int,
    c_uchar,
    c_uint
};

use alsa_sys::*;

use crate::time::RealTime;

//
// seq_event.h constants that alsa-sys doesn't carry
//

pub const QUEUE_DIRECT: u8 = 253;
pub const TIME_STAMP_REAL: u8 = 1 << 0;

const SND_SEQ_ADDRESS_SUBSCRIBERS: c_uchar = 254;
const SND_SEQ_ADDRESS_UNKNOWN: c_uchar = 253;

macro_rules! event_types {
    ($($variant:ident = $value:literal => $name:literal,)*) => {
        /// The kind of a sequencer event, numbered as in `seq_event.h`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EventType {
            $($variant,)*

            /// A kind this crate has no name for. Kept so it can be passed
            /// through unchanged.
            Unknown(u8)
        }

        impl EventType {
            pub fn from_raw(raw: u8) -> EventType {
                match raw {
                    $($value => EventType::$variant,)*
                    other => EventType::Unknown(other)
                }
            }

            pub fn raw(self) -> u8 {
                match self {
                    $(EventType::$variant => $value,)*
                    EventType::Unknown(raw) => raw
                }
            }

            /// Every named kind with its `SND_SEQ_EVENT_*` name.
            pub fn constants() -> &'static [(&'static str, EventType)] {
                &[$(($name, EventType::$variant),)*]
            }
        }
    }
}

event_types! {
    System = 0 => "SND_SEQ_EVENT_SYSTEM",
    Result = 1 => "SND_SEQ_EVENT_RESULT",

    Note = 5 => "SND_SEQ_EVENT_NOTE",
    NoteOn = 6 => "SND_SEQ_EVENT_NOTEON",
    NoteOff = 7 => "SND_SEQ_EVENT_NOTEOFF",
    KeyPress = 8 => "SND_SEQ_EVENT_KEYPRESS",

    Controller = 10 => "SND_SEQ_EVENT_CONTROLLER",
    PgmChange = 11 => "SND_SEQ_EVENT_PGMCHANGE",
    ChanPress = 12 => "SND_SEQ_EVENT_CHANPRESS",
    PitchBend = 13 => "SND_SEQ_EVENT_PITCHBEND",
    Control14 = 14 => "SND_SEQ_EVENT_CONTROL14",
    NonRegParam = 15 => "SND_SEQ_EVENT_NONREGPARAM",
    RegParam = 16 => "SND_SEQ_EVENT_REGPARAM",

    SongPos = 20 => "SND_SEQ_EVENT_SONGPOS",
    SongSel = 21 => "SND_SEQ_EVENT_SONGSEL",
    QFrame = 22 => "SND_SEQ_EVENT_QFRAME",
    TimeSign = 23 => "SND_SEQ_EVENT_TIMESIGN",
    KeySign = 24 => "SND_SEQ_EVENT_KEYSIGN",

    Start = 30 => "SND_SEQ_EVENT_START",
    Continue = 31 => "SND_SEQ_EVENT_CONTINUE",
    Stop = 32 => "SND_SEQ_EVENT_STOP",
    SetPosTick = 33 => "SND_SEQ_EVENT_SETPOS_TICK",
    SetPosTime = 34 => "SND_SEQ_EVENT_SETPOS_TIME",
    Tempo = 35 => "SND_SEQ_EVENT_TEMPO",
    Clock = 36 => "SND_SEQ_EVENT_CLOCK",
    Tick = 37 => "SND_SEQ_EVENT_TICK",
    QueueSkew = 38 => "SND_SEQ_EVENT_QUEUE_SKEW",
    SyncPos = 39 => "SND_SEQ_EVENT_SYNC_POS",

    TuneRequest = 40 => "SND_SEQ_EVENT_TUNE_REQUEST",
    Reset = 41 => "SND_SEQ_EVENT_RESET",
    Sensing = 42 => "SND_SEQ_EVENT_SENSING",

    Echo = 50 => "SND_SEQ_EVENT_ECHO",
    Oss = 51 => "SND_SEQ_EVENT_OSS",

    ClientStart = 60 => "SND_SEQ_EVENT_CLIENT_START",
    ClientExit = 61 => "SND_SEQ_EVENT_CLIENT_EXIT",
    ClientChange = 62 => "SND_SEQ_EVENT_CLIENT_CHANGE",
    PortStart = 63 => "SND_SEQ_EVENT_PORT_START",
    PortExit = 64 => "SND_SEQ_EVENT_PORT_EXIT",
    PortChange = 65 => "SND_SEQ_EVENT_PORT_CHANGE",
    PortSubscribed = 66 => "SND_SEQ_EVENT_PORT_SUBSCRIBED",
    PortUnsubscribed = 67 => "SND_SEQ_EVENT_PORT_UNSUBSCRIBED",

    Usr0 = 90 => "SND_SEQ_EVENT_USR0",
    Usr1 = 91 => "SND_SEQ_EVENT_USR1",
    Usr2 = 92 => "SND_SEQ_EVENT_USR2",
    Usr3 = 93 => "SND_SEQ_EVENT_USR3",
    Usr4 = 94 => "SND_SEQ_EVENT_USR4",
    Usr5 = 95 => "SND_SEQ_EVENT_USR5",
    Usr6 = 96 => "SND_SEQ_EVENT_USR6",
    Usr7 = 97 => "SND_SEQ_EVENT_USR7",
    Usr8 = 98 => "SND_SEQ_EVENT_USR8",
    Usr9 = 99 => "SND_SEQ_EVENT_USR9",

    Sysex = 130 => "SND_SEQ_EVENT_SYSEX",
    Bounce = 131 => "SND_SEQ_EVENT_BOUNCE",

    UsrVar0 = 135 => "SND_SEQ_EVENT_USR_VAR0",
    UsrVar1 = 136 => "SND_SEQ_EVENT_USR_VAR1",
    UsrVar2 = 137 => "SND_SEQ_EVENT_USR_VAR2",
    UsrVar3 = 138 => "SND_SEQ_EVENT_USR_VAR3",
    UsrVar4 = 139 => "SND_SEQ_EVENT_USR_VAR4",

    None = 255 => "SND_SEQ_EVENT_NONE",
}

/// Which payload layout an event type carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFamily {
    Note,
    Control,
    Other
}

impl EventType {
    pub fn family(self) -> EventFamily {
        match self {
            EventType::Note
                | EventType::NoteOn
                | EventType::NoteOff
                | EventType::KeyPress => EventFamily::Note,

            EventType::Controller
                | EventType::PgmChange
                | EventType::ChanPress
                | EventType::PitchBend => EventFamily::Control,

            _ => EventFamily::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Address {
    pub client: u8,
    pub port: u8
}

impl Address {
    /// Destination meaning "every port subscribed to the source".
    pub const SUBSCRIBERS: Address = Address {
        client: SND_SEQ_ADDRESS_SUBSCRIBERS,
        port: SND_SEQ_ADDRESS_UNKNOWN
    };

    pub fn new(client: u8, port: u8) -> Address {
        Address {
            client: client,
            port: port
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueRef {
    /// Deliver immediately, bypassing any queue.
    Direct,
    Queue(u8)
}

impl QueueRef {
    pub fn from_raw(raw: u8) -> QueueRef {
        match raw {
            QUEUE_DIRECT => QueueRef::Direct,
            queue => QueueRef::Queue(queue)
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            QueueRef::Direct => QUEUE_DIRECT,
            QueueRef::Queue(queue) => queue
        }
    }

    pub fn is_direct(self) -> bool {
        self == QueueRef::Direct
    }
}

impl Default for QueueRef {
    fn default() -> QueueRef {
        QueueRef::Direct
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteData {
    pub channel: u8,
    pub note: u8,
    pub velocity: u8,
    pub off_velocity: u8,
    pub duration: u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlData {
    pub channel: u8,

    /// Reserved bytes of the kernel struct, passed through untouched.
    pub unused: [u8; 3],

    pub param: u32,
    pub value: i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventData {
    Note(NoteData),
    Control(ControlData),

    /// Kinds whose payload isn't decoded.
    Other
}

impl EventData {
    fn family(&self) -> EventFamily {
        match *self {
            EventData::Note(_) => EventFamily::Note,
            EventData::Control(_) => EventFamily::Control,
            EventData::Other => EventFamily::Other
        }
    }
}

/// The flattened event record exchanged with the sequencer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub flags: u8,
    pub tag: u8,
    pub queue: QueueRef,

    /// Seconds since the queue (or sequencer) started.
    pub time: f64,

    pub source: Address,
    pub dest: Address,
    pub data: EventData
}

impl Event {
    pub fn new(event_type: EventType) -> Event {
        Event {
            event_type: event_type,
            flags: 0,
            tag: 0,
            queue: QueueRef::Direct,
            time: 0.0,
            source: Address::default(),
            dest: Address::default(),
            data: EventData::Other
        }
    }

    pub fn note(event_type: EventType, note: NoteData) -> Event {
        Event {
            data: EventData::Note(note),
            ..Event::new(event_type)
        }
    }

    pub fn control(event_type: EventType, control: ControlData) -> Event {
        Event {
            data: EventData::Control(control),
            ..Event::new(event_type)
        }
    }

    /// Payload, if it is the one this event's type calls for.
    pub fn payload(&self) -> EventData {
        if self.data.family() == self.event_type.family() {
            self.data
        } else {
            EventData::Other
        }
    }

    pub fn to_snd_seq_event(&self) -> snd_seq_event_t {
        let mut ev: snd_seq_event_t = unsafe { mem::zeroed() };

        ev.type_ = self.event_type.raw();
        ev.flags = self.flags;
        ev.tag = self.tag;
        ev.queue = self.queue.raw();
        ev.time.time = RealTime::from_secs_f64(self.time).to_raw();
        ev.source = to_addr(self.source);
        ev.dest = to_addr(self.dest);

        match self.payload() {
            EventData::Note(ref note) => ev.set_note(note),
            EventData::Control(ref control) => ev.set_control(control),
            EventData::Other => {}
        }

        ev
    }

    pub fn from_snd_seq_event(ev: &snd_seq_event_t) -> Event {
        let event_type = EventType::from_raw(ev.type_ as u8);
        let time = unsafe { ev.time.time };

        let data = match event_type.family() {
            EventFamily::Note => EventData::Note(ev.note()),
            EventFamily::Control => EventData::Control(ev.control()),
            EventFamily::Other => EventData::Other
        };

        Event {
            event_type: event_type,
            flags: ev.flags,
            tag: ev.tag,
            queue: QueueRef::from_raw(ev.queue),
            time: RealTime::from_raw(&time).as_secs_f64(),
            source: from_addr(&ev.source),
            dest: from_addr(&ev.dest),
            data: data
        }
    }
}

fn to_addr(addr: Address) -> snd_seq_addr_t {
    snd_seq_addr_t {
        client: addr.client,
        port: addr.port
    }
}

fn from_addr(addr: &snd_seq_addr_t) -> Address {
    Address::new(addr.client, addr.port)
}

//
// accessors for the data union, after the snd_seq_ev_set_* macros
//

pub trait TransliteratedFromCMacros {
    fn set_note(&mut self, note: &NoteData);
    fn set_control(&mut self, control: &ControlData);

    fn note(&self) -> NoteData;
    fn control(&self) -> ControlData;
}

impl TransliteratedFromCMacros for snd_seq_event_t {
    #[inline]
    fn set_note(&mut self, note: &NoteData) {
        let raw = unsafe { &mut *(&mut self.data as *mut _ as *mut snd_seq_ev_note_t) };

        raw.channel = note.channel;
        raw.note = note.note;
        raw.velocity = note.velocity;
        raw.off_velocity = note.off_velocity;
        raw.duration = note.duration as c_uint;
    }

    #[inline]
    fn set_control(&mut self, control: &ControlData) {
        let raw = unsafe { &mut *(&mut self.data as *mut _ as *mut snd_seq_ev_ctrl_t) };

        raw.channel = control.channel;
        raw.unused = control.unused;
        raw.param = control.param as c_uint;
        raw.value = control.value as c_int;
    }

    #[inline]
    fn note(&self) -> NoteData {
        let raw = unsafe { &*(&self.data as *const _ as *const snd_seq_ev_note_t) };

        NoteData {
            channel: raw.channel,
            note: raw.note,
            velocity: raw.velocity,
            off_velocity: raw.off_velocity,
            duration: raw.duration as u32
        }
    }

    #[inline]
    fn control(&self) -> ControlData {
        let raw = unsafe { &*(&self.data as *const _ as *const snd_seq_ev_ctrl_t) };

        ControlData {
            channel: raw.channel,
            unused: raw.unused,
            param: raw.param as u32,
            value: raw.value as i32
        }
    }
}
