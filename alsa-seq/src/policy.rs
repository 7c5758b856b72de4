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

//! Corrections applied to every event on its way out.
//!
//! None of these reject an event. A malformed source port or a foreign queue
//! is silently replaced with something this client is allowed to use.

use crate::event::{
    Address,
    Event,
    EventType,
    QueueRef
};

use crate::port::PortRange;

/// A client may only schedule on its own queue. Direct events stay direct.
pub fn rewrite_queue(ev: &mut Event, own_queue: QueueRef) {
    if !ev.queue.is_direct() {
        ev.queue = own_queue;
    }
}

/// Pull the source port into the client's output ports.
pub fn clamp_source_port(ev: &mut Event, outputs: Option<PortRange>) {
    if let Some(range) = outputs {
        ev.source.port = range.clamp(ev.source.port);
    }
}

/// Everything but `Echo` goes to the source port's subscribers, whatever
/// destination the caller set.
pub fn route_to_subscribers(ev: &mut Event) {
    if ev.event_type != EventType::Echo {
        ev.dest = Address::SUBSCRIBERS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::event::NoteData;

    fn note_on() -> Event {
        Event::note(EventType::NoteOn, NoteData {
            channel: 0,
            note: 60,
            velocity: 90,
            off_velocity: 0,
            duration: 0
        })
    }

    #[test]
    fn foreign_queue_is_replaced() {
        let mut ev = note_on();
        ev.queue = QueueRef::Queue(7);

        rewrite_queue(&mut ev, QueueRef::Queue(1));
        assert_eq!(ev.queue, QueueRef::Queue(1));
    }

    #[test]
    fn direct_stays_direct() {
        let mut ev = note_on();

        rewrite_queue(&mut ev, QueueRef::Queue(1));
        assert_eq!(ev.queue, QueueRef::Direct);
    }

    #[test]
    fn source_port_clamps_both_ways() {
        let range = Some(PortRange { first: 2, last: 3 });

        let mut ev = note_on();
        ev.source.port = 0;
        clamp_source_port(&mut ev, range);
        assert_eq!(ev.source.port, 2);

        ev.source.port = 9;
        clamp_source_port(&mut ev, range);
        assert_eq!(ev.source.port, 3);

        ev.source.port = 3;
        clamp_source_port(&mut ev, range);
        assert_eq!(ev.source.port, 3);
    }

    #[test]
    fn clamp_leaves_source_client_alone() {
        let mut ev = note_on();
        ev.source = Address::new(130, 9);

        clamp_source_port(&mut ev, Some(PortRange { first: 1, last: 1 }));
        assert_eq!(ev.source, Address::new(130, 1));
    }

    #[test]
    fn non_echo_goes_to_subscribers() {
        let mut ev = note_on();
        ev.dest = Address::new(20, 0);

        route_to_subscribers(&mut ev);
        assert_eq!(ev.dest, Address::SUBSCRIBERS);
    }

    #[test]
    fn echo_keeps_destination() {
        let mut ev = Event::new(EventType::Echo);
        ev.dest = Address::new(5, 0);

        route_to_subscribers(&mut ev);
        assert_eq!(ev.dest, Address::new(5, 0));
    }
}
