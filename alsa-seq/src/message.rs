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

use midi::*;

use crate::event::{
    ControlData,
    Event,
    EventType,
    NoteData
};

/// MIDI channel voice messages as sequencer events.
pub trait ToSequencerEvent {
    /// `None` for messages with no fixed-size sequencer equivalent.
    fn to_sequencer_event(&self) -> Option<Event>;
}

fn note(event_type: EventType, channel: Channel, note_number: U7, velocity: U7) -> Event {
    Event::note(event_type, NoteData {
        channel: channel as u8,
        note: note_number,
        velocity: velocity,
        off_velocity: 0,
        duration: 0
    })
}

fn control(event_type: EventType, channel: Channel, param: u32, value: i32) -> Event {
    Event::control(event_type, ControlData {
        channel: channel as u8,
        unused: [0; 3],
        param: param,
        value: value
    })
}

impl ToSequencerEvent for Message {
    fn to_sequencer_event(&self) -> Option<Event> {
        let ev = match *self {
            Message::NoteOn(channel, note_number, velocity) =>
                note(EventType::NoteOn, channel, note_number, velocity),

            Message::NoteOff(channel, note_number, velocity) =>
                note(EventType::NoteOff, channel, note_number, velocity),

            Message::PolyphonicPressure(channel, note_number, pressure) =>
                note(EventType::KeyPress, channel, note_number, pressure),

            Message::ControlChange(channel, controller, value) =>
                control(EventType::Controller, channel, controller as u32, value as i32),

            Message::ProgramChange(channel, program) =>
                control(EventType::PgmChange, channel, 0, program as i32),

            Message::ChannelPressure(channel, pressure) =>
                control(EventType::ChanPress, channel, 0, pressure as i32),

            // the sequencer centres pitch bend on zero
            Message::PitchBend(channel, bend) =>
                control(EventType::PitchBend, channel, 0, (bend as i32) - 8192),

            _ => return None
        };

        Some(ev)
    }
}
