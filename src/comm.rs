//! Point-to-point messaging between workers.
//!
//! Every message carries the sender's rank and a [`Tag`]; a receive names both and blocks until
//! a matching message arrives, holding on to anything else that shows up first. Frames are
//! bincode-encoded so the in-process transport moves exactly the bytes a networked one would.

use crate::{Cell, Error, Result};
use bincode::{deserialize_from, serialize_into};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Barrier};

/// Disambiguates messages travelling between the same pair of workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// A first interior row travelling to the ring predecessor.
    Up,
    /// A last interior row travelling to the ring successor.
    Down,
    /// Corner cells exchanged directly between the first and last worker.
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// A global row handed out by the coordinator.
    Scatter(u64),
    /// A global row collected by the coordinator.
    Gather(u64),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Interior cells of one row.
    Row(Vec<Cell>),
    Cell(Cell),
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    source: u32,
    tag: Tag,
    payload: Payload,
}

/// Blocking, tagged, point-to-point messaging plus a global barrier.
pub trait Communicator {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    fn send(&mut self, dest: usize, tag: Tag, payload: Payload) -> Result<()>;

    /// Block until a message from `source` tagged `tag` arrives.
    fn recv(&mut self, source: usize, tag: Tag) -> Result<Payload>;

    /// Block until every worker has reached the barrier.
    fn barrier(&self);

    /// Receive a row of exactly `len` cells.
    fn recv_row(&mut self, source: usize, tag: Tag, len: usize) -> Result<Vec<Cell>> {
        match self.recv(source, tag)? {
            Payload::Row(cells) if cells.len() == len => Ok(cells),
            _ => Err(Error::UnexpectedPayload {
                rank: self.rank(),
                peer: source,
                expected: format!("a row of {} cells tagged {:?}", len, tag),
            }),
        }
    }

    fn recv_cell(&mut self, source: usize, tag: Tag) -> Result<Cell> {
        match self.recv(source, tag)? {
            Payload::Cell(cell) => Ok(cell),
            _ => Err(Error::UnexpectedPayload {
                rank: self.rank(),
                peer: source,
                expected: format!("a single cell tagged {:?}", tag),
            }),
        }
    }
}

/// A worker's endpoint in an in-process cluster built by [`cluster`].
#[derive(Debug)]
pub struct ChannelCommunicator {
    rank: usize,
    peers: Vec<Option<Sender<Vec<u8>>>>,
    inbox: Receiver<Vec<u8>>,
    pending: VecDeque<Envelope>,
    barrier: Arc<Barrier>,
}

/// Connect `size` workers with channels. Endpoint `i` has rank `i`.
pub fn cluster(size: usize) -> Vec<ChannelCommunicator> {
    let (senders, inboxes): (Vec<_>, Vec<_>) = (0..size).map(|_| channel()).unzip();
    let barrier = Arc::new(Barrier::new(size));
    inboxes
        .into_iter()
        .enumerate()
        .map(|(rank, inbox)| ChannelCommunicator {
            rank,
            peers: senders
                .iter()
                .enumerate()
                .map(|(peer, sender)| (peer != rank).then(|| sender.clone()))
                .collect(),
            inbox,
            pending: VecDeque::new(),
            barrier: barrier.clone(),
        })
        .collect()
}

impl ChannelCommunicator {
    fn take_pending(&mut self, source: usize, tag: Tag) -> Option<Payload> {
        let ix = self
            .pending
            .iter()
            .position(|e| e.source as usize == source && e.tag == tag)?;
        self.pending.remove(ix).map(|e| e.payload)
    }
}

impl Communicator for ChannelCommunicator {
    #[inline]
    fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    fn size(&self) -> usize {
        self.peers.len()
    }

    fn send(&mut self, dest: usize, tag: Tag, payload: Payload) -> Result<()> {
        let rank = self.rank;
        let sender = self
            .peers
            .get(dest)
            .and_then(Option::as_ref)
            .ok_or(Error::Disconnected { rank, peer: dest })?;
        let envelope = Envelope {
            source: rank as u32,
            tag,
            payload,
        };
        let mut frame = Vec::new();
        serialize_into(&mut frame, &envelope).map_err(|source| Error::Codec { rank, source })?;
        sender
            .send(frame)
            .map_err(|_| Error::Disconnected { rank, peer: dest })
    }

    fn recv(&mut self, source: usize, tag: Tag) -> Result<Payload> {
        if let Some(payload) = self.take_pending(source, tag) {
            return Ok(payload);
        }
        let rank = self.rank;
        loop {
            let frame = self
                .inbox
                .recv()
                .map_err(|_| Error::Disconnected { rank, peer: source })?;
            let envelope: Envelope = deserialize_from(frame.as_slice())
                .map_err(|source| Error::Codec { rank, source })?;
            if envelope.source as usize == source && envelope.tag == tag {
                return Ok(envelope.payload);
            }
            self.pending.push_back(envelope);
        }
    }

    fn barrier(&self) {
        self.barrier.wait();
    }
}
