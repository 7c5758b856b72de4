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

use std::cell::RefCell;
use std::collections::VecDeque;
use std::os::unix::io::RawFd;
use std::rc::Rc;

#[allow(unused_imports)]
use super::*;

//
// an in-memory sequencer, so the client can be driven without ALSA
//

#[derive(Default)]
struct SeqState {
    next_port: u8,
    ports: Vec<(u8, String, PortCapabilities)>,
    deleted_ports: Vec<u8>,
    fail_port_creation_at: Option<usize>,

    queue: Option<u8>,
    fail_queue_allocation: bool,
    queue_freed: bool,
    running: bool,
    queued_events: i32,
    timestamped_ports: Vec<(u8, u8)>,

    connections: Vec<(u8, Address)>,
    connect_result: i32,

    inbox: VecDeque<Event>,
    sent: Vec<Event>,
    output_result: i32,

    fds: Vec<RawFd>,
    drains: usize,
    syncs: usize
}

#[derive(Clone, Default)]
struct MemorySeq(Rc<RefCell<SeqState>>);

impl MemorySeq {
    fn state(&self) -> std::cell::RefMut<'_, SeqState> {
        self.0.borrow_mut()
    }
}

impl Subsystem for MemorySeq {
    fn client_id(&self) -> i32 {
        128
    }

    fn alloc_queue(&mut self) -> Result<u8, i32> {
        let mut state = self.state();

        if state.fail_queue_allocation {
            return Err(-16);
        }

        state.queue = Some(0);
        Ok(0)
    }

    fn free_queue(&mut self, queue: u8) {
        let mut state = self.state();
        assert_eq!(state.queue, Some(queue));
        state.queue_freed = true;
    }

    fn create_port(&mut self, name: &str, capabilities: PortCapabilities, _: PortType)
        -> Result<u8, i32> {
        let mut state = self.state();

        if state.fail_port_creation_at == Some(state.ports.len()) {
            return Err(-12);
        }

        let port = state.next_port;
        state.next_port += 1;
        state.ports.push((port, name.to_owned(), capabilities));
        Ok(port)
    }

    fn delete_port(&mut self, port: u8) {
        self.state().deleted_ports.push(port);
    }

    fn set_port_timestamping(&mut self, port: u8, queue: u8) -> Result<(), i32> {
        self.state().timestamped_ports.push((port, queue));
        Ok(())
    }

    fn control_queue(&mut self, _: u8, control: QueueControl) -> i32 {
        self.state().running = control == QueueControl::Start;
        0
    }

    fn queue_status(&self, _: u8) -> Result<QueueStatus, i32> {
        let state = self.0.borrow();
        Ok(QueueStatus::new(state.running, RealTime { sec: 2, nsec: 500_000_000 },
                            state.queued_events))
    }

    fn connect_from(&mut self, port: u8, sender: Address) -> i32 {
        let mut state = self.state();
        state.connections.push((port, sender));
        state.connect_result
    }

    fn connect_to(&mut self, port: u8, dest: Address) -> i32 {
        let mut state = self.state();
        state.connections.push((port, dest));
        state.connect_result
    }

    fn poll_descriptors(&self) -> Vec<RawFd> {
        self.0.borrow().fds.clone()
    }

    fn event_input(&mut self) -> Result<Event, i32> {
        self.state().inbox.pop_front().ok_or(-11)
    }

    fn event_input_pending(&mut self, _: bool) -> i32 {
        self.state().inbox.len() as i32
    }

    fn event_output_direct(&mut self, ev: &Event) -> i32 {
        let mut state = self.state();
        state.sent.push(*ev);
        state.output_result
    }

    fn drain_output(&mut self) -> i32 {
        self.state().drains += 1;
        0
    }

    fn sync_output_queue(&mut self) -> i32 {
        self.state().syncs += 1;
        0
    }
}

fn memory_client(inputs: usize, outputs: usize, queue: bool) -> (SequencerClient<MemorySeq>, MemorySeq) {
    let seq = MemorySeq::default();
    let config = ClientConfig::new("Test", inputs, outputs, queue);

    (SequencerClient::configure(seq.clone(), &config).unwrap(), seq)
}

fn note_on(source_port: u8) -> Event {
    let mut ev = Event::note(EventType::NoteOn, NoteData {
        channel: 0,
        note: 64,
        velocity: 100,
        off_velocity: 0,
        duration: 0
    });

    ev.source.port = source_port;
    ev
}

#[test]
fn test_output_range_follows_port_counts() {
    for inputs in 0..4 {
        for outputs in 1..4 {
            let (client, _) = memory_client(inputs, outputs, true);
            let range = client.output_port_range().unwrap();

            assert_eq!(range.first as usize, inputs);
            assert_eq!(range.last as usize, inputs + outputs - 1);
        }
    }
}

#[test]
fn test_ports_created_inputs_first() {
    let (client, seq) = memory_client(2, 1, true);

    assert_eq!(client.input_ports(), &[0, 1]);
    assert_eq!(client.output_ports(), &[2]);

    let state = seq.state();
    assert_eq!(state.ports[0].1, "Input port");
    assert_eq!(state.ports[0].2, PORT_CAPABILITY_WRITE | PORT_CAPABILITY_SUBS_WRITE);
    assert_eq!(state.ports[2].1, "Output port");
    assert_eq!(state.ports[2].2, PORT_CAPABILITY_READ | PORT_CAPABILITY_SUBS_READ);

    assert_eq!(state.timestamped_ports, vec![(0, 0), (1, 0)]);
}

#[test]
fn test_no_queue_no_timestamping() {
    let (client, seq) = memory_client(2, 2, false);

    assert_eq!(client.queue(), QueueRef::Direct);
    assert!(seq.state().timestamped_ports.is_empty());
}

#[test]
fn test_port_failure_rolls_back() {
    let seq = MemorySeq::default();
    seq.state().fail_port_creation_at = Some(3);

    let config = ClientConfig::new("Test", 2, 2, true);

    match SequencerClient::configure(seq.clone(), &config) {
        Err(Error::PortCreation { index, direction, .. }) => {
            assert_eq!(index, 1);
            assert_eq!(direction, PortDirection::Output);
        }
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("configure should have failed")
    }

    let state = seq.state();
    let mut deleted = state.deleted_ports.clone();
    deleted.sort();

    assert_eq!(deleted, vec![0, 1, 2]);
    assert!(state.queue_freed);
}

#[test]
fn test_queue_allocation_failure() {
    let seq = MemorySeq::default();
    seq.state().fail_queue_allocation = true;

    let config = ClientConfig::new("Test", 1, 1, true);

    match SequencerClient::configure(seq.clone(), &config) {
        Err(Error::QueueAllocation(code)) => assert_eq!(code, -16),
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("configure should have failed")
    }

    let state = seq.state();
    assert!(state.ports.is_empty());
    assert!(state.deleted_ports.is_empty());
    assert!(!state.queue_freed);
}

#[test]
fn test_name_with_nul_is_rejected() {
    match SequencerHandle::open("a\0b", HandleOpenStreams::Duplex) {
        Err(Error::InvalidName) => {}
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("open should have failed")
    }

    let config = ClientConfig::new("bad\0name", 1, 1, true);

    match SequencerClient::open(&config) {
        Err(Error::InvalidName) => {}
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("open should have failed")
    }
}

#[test]
fn test_too_many_ports() {
    let config = ClientConfig::new("Test", 200, 100, false);

    match SequencerClient::configure(MemorySeq::default(), &config) {
        Err(Error::PortCount { count }) => assert_eq!(count, 300),
        _ => panic!("expected a port count error")
    }
}

#[test]
fn test_drop_releases_ports_and_queue() {
    let (client, seq) = memory_client(1, 1, true);
    drop(client);

    let state = seq.state();
    assert_eq!(state.deleted_ports, vec![1, 0]);
    assert!(state.queue_freed);
}

#[test]
fn test_source_port_is_clamped() {
    let (mut client, seq) = memory_client(2, 2, true);

    client.send_event(note_on(0));
    client.send_event(note_on(3));
    client.send_event(note_on(250));

    let sent: Vec<u8> = seq.state().sent.iter().map(|ev| ev.source.port).collect();
    assert_eq!(sent, vec![2, 3, 3]);
}

#[test]
fn test_queue_is_rewritten() {
    let (mut client, seq) = memory_client(1, 1, true);

    let mut ev = note_on(1);
    ev.queue = QueueRef::Queue(9);
    client.send_event(ev);

    let mut direct = note_on(1);
    direct.queue = QueueRef::Direct;
    client.send_event(direct);

    let state = seq.state();
    assert_eq!(state.sent[0].queue, QueueRef::Queue(0));
    assert_eq!(state.sent[1].queue, QueueRef::Direct);
}

#[test]
fn test_send_returns_raw_result() {
    let (mut client, seq) = memory_client(1, 1, true);

    seq.state().output_result = -32;
    assert_eq!(client.send_event(note_on(1)), -32);

    seq.state().output_result = 28;
    assert_eq!(client.send_event(note_on(1)), 28);
}

#[test]
fn test_scenario_echo_and_clamp() {
    let (mut client, seq) = memory_client(1, 1, true);

    assert_eq!(client.output_port_range(), Some(PortRange { first: 1, last: 1 }));

    let mut ev = note_on(5);
    ev.dest = Address::new(5, 0);
    client.send_event(ev);

    let mut echo = Event::new(EventType::Echo);
    echo.dest = Address::new(5, 0);
    client.send_event(echo);

    let state = seq.state();
    assert_eq!(state.sent[0].source.port, 1);
    assert_eq!(state.sent[0].dest, Address::SUBSCRIBERS);
    assert_eq!(state.sent[1].dest, Address::new(5, 0));
}

#[test]
fn test_payload_is_sent_untouched() {
    let (mut client, seq) = memory_client(0, 1, true);

    let control = ControlData {
        channel: 2,
        unused: [9, 8, 7],
        param: 74,
        value: 33
    };

    client.send_event(Event::control(EventType::Controller, control));
    assert_eq!(seq.state().sent[0].data, EventData::Control(control));
}

#[test]
fn test_start_stop_status() {
    let (mut client, seq) = memory_client(1, 1, true);

    assert!(client.start());
    assert!(client.status().unwrap().running);

    assert!(client.stop());
    assert!(!client.status().unwrap().running);

    assert_eq!(seq.state().drains, 2);
}

#[test]
fn test_status_combines_time() {
    let (client, seq) = memory_client(1, 1, true);
    seq.state().queued_events = 4;

    let status = client.status().unwrap();
    assert!((status.time - 2.5).abs() < 1.0e-9);
    assert_eq!(status.events, 4);
}

#[test]
fn test_queue_control_without_queue() {
    let (mut client, seq) = memory_client(1, 1, false);

    assert!(client.start());
    assert!(client.stop());
    assert_eq!(client.status().unwrap(), QueueStatus::stopped());
    assert_eq!(seq.state().drains, 0);
}

#[test]
fn test_pending_count_needs_queue() {
    let (mut client, seq) = memory_client(1, 1, false);
    seq.state().inbox.push_back(note_on(0));

    assert_eq!(client.pending_count(), 0);

    let (mut client, seq) = memory_client(1, 1, true);
    seq.state().inbox.push_back(note_on(0));
    seq.state().inbox.push_back(note_on(0));

    assert_eq!(client.pending_count(), 2);
}

#[test]
fn test_receive_event() {
    let (mut client, seq) = memory_client(1, 1, true);

    let mut incoming = note_on(0);
    incoming.time = 1.25;
    seq.state().inbox.push_back(incoming);

    assert_eq!(client.receive_event().unwrap(), incoming);

    match client.receive_event() {
        Err(Error::Receive(code)) => assert_eq!(code, -11),
        other => panic!("expected a receive error, got {:?}", other)
    }
}

#[test]
fn test_connections_report_success() {
    let (mut client, seq) = memory_client(1, 1, true);

    assert!(client.connect_from(0, 20, 0));
    assert!(client.connect_to(1, 14, 0));

    seq.state().connect_result = -16;
    assert!(!client.connect_to(1, 14, 0));

    assert_eq!(seq.state().connections[0], (0, Address::new(20, 0)));
}

#[test]
fn test_first_descriptor_only() {
    let (client, seq) = memory_client(1, 1, true);
    assert_eq!(client.pollable_descriptor(), None);

    seq.state().fds = vec![7, 9];
    assert_eq!(client.pollable_descriptor(), Some(7));
}

#[test]
fn test_flush_syncs_output() {
    let (mut client, seq) = memory_client(1, 1, true);

    client.flush_output();
    assert_eq!(seq.state().syncs, 1);
}

#[test]
fn test_independent_clients() {
    let (mut a, seq_a) = memory_client(1, 1, true);
    let (mut b, seq_b) = memory_client(0, 2, false);

    a.send_event(note_on(0));
    b.send_event(note_on(0));

    assert_eq!(seq_a.state().sent.len(), 1);
    assert_eq!(seq_b.state().sent[0].queue, QueueRef::Direct);
    assert_eq!(seq_b.state().sent[0].source.port, 0);
}

//
// against the real sequencer
//

#[test]
#[ignore]
fn test_seq_open() {
    SequencerHandle::open("alsa-seq.rs", HandleOpenStreams::Output).unwrap();
}

#[test]
#[ignore]
fn test_seq_client() {
    let mut client = SequencerClient::open(&ClientConfig::new("alsa-seq.rs", 1, 1, true)).unwrap();

    assert!(client.client_id() > 0);
    assert_eq!(client.output_port_range(), Some(PortRange { first: 1, last: 1 }));
    assert!(client.pollable_descriptor().is_some());

    assert!(client.start());
    assert!(client.status().unwrap().running);
    assert!(client.stop());
    assert!(!client.status().unwrap().running);
}
