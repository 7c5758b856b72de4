//  seqthru: echoes MIDI through an ALSA sequencer client
//  Copyright (C) 2015 William Light <wrl@illest.net>
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU Lesser General Public License as
//  published by the Free Software Foundation, either version 3 of the
//  License, or (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU Lesser General Public License for more details.
//
//  You should have received a copy of the GNU Lesser General Public
//  License along with this program.  If not, see
//  <http://www.gnu.org/licenses/>.

use std::env;
use std::process;

use std::time::{
    Duration,
    Instant
};

use nix::errno::Errno;
use nix::poll::*;

use tracing::{
    debug,
    error,
    info,
    warn
};

use tracing_subscriber::EnvFilter;

use alsa_seq::*;

const STATUS_INTERVAL: Duration = Duration::from_secs(5);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn usage(prog_name: &str) {
    println!("usage: {} [client name] [source client:port]", prog_name);
}

fn parse_address(arg: &str) -> Option<Address> {
    let mut parts = arg.splitn(2, ':');

    let client = parts.next()?.parse().ok()?;
    let port = parts.next().unwrap_or("0").parse().ok()?;

    Some(Address::new(client, port))
}

fn forward(client: &mut SequencerClient, ev: &Event) {
    if ev.event_type.family() == EventFamily::Other {
        return;
    }

    let mut out = *ev;
    out.queue = QueueRef::Direct;

    // the client clamps this onto its first output port
    out.source.port = 0;

    match client.send_event(out) {
        err @ _ if err < 0 => warn!(code = err, "couldn't forward event"),
        _ => {}
    }
}

fn drain_input(client: &mut SequencerClient) {
    while client.pending_count() > 0 {
        let ev = match client.receive_event() {
            Ok(ev) => ev,
            Err(err) => {
                warn!(%err, "dropping input");
                return;
            }
        };

        info!(kind = ?ev.event_type, time = ev.time, source = ?ev.source, data = ?ev.data, "event");
        forward(client, &ev);
    }
}

fn ev_loop(client: &mut SequencerClient) {
    let fd = match client.pollable_descriptor() {
        Some(fd) => fd,
        None => {
            error!("sequencer has no input descriptor");
            return;
        }
    };

    let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];
    let mut last_status = Instant::now();

    loop {
        match poll(&mut fds, 1000) {
            Ok(_) => {},
            Err(Errno::EINTR) => continue,
            Err(err) => {
                error!(%err, "poll failed");
                return;
            }
        }

        if fds[0].revents().map_or(false, |revents| revents.contains(PollFlags::POLLIN)) {
            drain_input(client);
        }

        if last_status.elapsed() >= STATUS_INTERVAL {
            match client.status() {
                Ok(status) => debug!(running = status.running, time = status.time,
                                     events = status.events, "queue status"),
                Err(err) => warn!(%err, "couldn't read queue status")
            }

            last_status = Instant::now();
        }
    }
}

fn main() {
    init_tracing();

    let args: Vec<_> = env::args().collect();

    if args.len() > 3 {
        usage(&args[0]);
        process::exit(1);
    }

    let mut config = ClientConfig::default();
    config.name = args.get(1).cloned().unwrap_or_else(|| "seqthru".to_owned());

    let mut client = match SequencerClient::open(&config) {
        Ok(client) => client,
        Err(err) => {
            error!(%err, "couldn't set up sequencer client");
            process::exit(1);
        }
    };

    info!(client = client.client_id(), name = %config.name, "sequencer client ready");

    if let Some(arg) = args.get(2) {
        let source = match parse_address(arg) {
            Some(source) => source,
            None => {
                usage(&args[0]);
                process::exit(1);
            }
        };

        let input = client.input_ports()[0];

        if !client.connect_from(input, source.client, source.port) {
            warn!(client = source.client, port = source.port, "couldn't connect from source");
        }
    }

    if !client.start() {
        error!("couldn't start queue");
        process::exit(1);
    }

    ev_loop(&mut client);

    client.stop();
    client.flush_output();
}
