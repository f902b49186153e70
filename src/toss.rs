// -*- mode: rust; -*-
//
// This file is part of ssc-core.
// See LICENSE for licensing information.

//! The Toss state: the per-epoch mutable accumulator of commitments,
//! openings, shares and certificates.
//!
//! Two traits express the two-tier read/read-write capability the design
//! notes call for: [`TossRead`] is the read-only view; [`Toss`] extends it
//! with the `put*`/`del*`/`reset_cos`/`set_epoch_or_slot` mutation surface.
//! [`InMemoryToss`] is the straightforward implementation; [`TransactionalToss`]
//! layers an undo journal over a `&mut InMemoryToss` so an outer driver can
//! apply a block's operations optimistically and roll them back atomically
//! on failure, without a transformer stack.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::ids::{EpochIndex, Pk, StakeSet};
use crate::messages::{constants::SCHEMA_VERSION, Opening, SharesMap, SignedCommitment, VssCertificate};

/// `PK -> SignedCommitment`, at most one per stakeholder per epoch.
pub type CommitmentsMap = BTreeMap<Pk, SignedCommitment>;
/// `PK -> Opening`.
pub type OpeningsMap = BTreeMap<Pk, Opening>;
/// `PK -> VssCertificate`.
pub type VssCertificatesMap = BTreeMap<Pk, VssCertificate>;

/// The read-only stake oracle the Toss state consults, never computes.
/// The "richmen" service (out of scope per the purpose statement); a
/// concrete implementation is supplied by the node and queried through
/// this trait.
pub trait StakeOracle {
    /// `getRichmen(E)`: the stakeholders eligible to participate at `E`,
    /// or `None` if stake for `E` is not yet known.
    fn get_richmen(&self, epoch: EpochIndex) -> Option<StakeSet>;
}

/// The read-only half of the Toss state contract.
pub trait TossRead {
    /// `getCommitments()`.
    fn get_commitments(&self) -> &CommitmentsMap;
    /// `getOpenings()`.
    fn get_openings(&self) -> &OpeningsMap;
    /// `getShares()`.
    fn get_shares(&self) -> &SharesMap;
    /// `getVssCertificates()`.
    fn get_vss_certificates(&self) -> &VssCertificatesMap;
    /// `getStableCertificates(E)`: certificates considered stable (i.e.
    /// committed deep enough not to be undone by a reorg) as of `E`.
    ///
    /// This crate does not define "stable": reorg depth is a consensus
    /// concern the core only reads the result of. The default in-memory
    /// implementation returns every unexpired certificate; a node wiring
    /// in real reorg-depth tracking replaces this method.
    fn get_stable_certificates(&self, epoch: EpochIndex) -> VssCertificatesMap {
        self.get_vss_certificates()
            .iter()
            .filter(|(_, cert)| cert.expiry_epoch >= epoch)
            .map(|(pk, cert)| (*pk, *cert))
            .collect()
    }
    /// The current logical clock position.
    fn current_epoch_or_slot(&self) -> u64;
}

/// The read-write half of the Toss state contract.
///
/// `put*` operations are unchecked inserts: the caller must have already
/// verified the message and confirmed participant eligibility via
/// `StakeOracle`/`get_stable_certificates` before calling. A `put*` on an
/// existing key overwrites (last-writer-wins within a block-application
/// pass); the driver is responsible for rejecting duplicates at the
/// verification layer if that is the desired policy.
pub trait Toss: TossRead {
    /// `putCommitment(SC)`.
    fn put_commitment(&mut self, pk: Pk, sc: SignedCommitment);
    /// `putOpening(PK, O)`.
    fn put_opening(&mut self, pk: Pk, opening: Opening);
    /// `putShares(PK, innerShares)`.
    fn put_shares(&mut self, pk: Pk, inner: BTreeMap<Pk, crate::messages::Share>);
    /// `putCertificate(cert)`, keyed by the certifying stakeholder.
    fn put_certificate(&mut self, pk: Pk, cert: VssCertificate);
    /// `delCommitment(PK)`.
    fn del_commitment(&mut self, pk: &Pk);
    /// `delOpening(PK)`.
    fn del_opening(&mut self, pk: &Pk);
    /// `delShares(PK)`.
    fn del_shares(&mut self, pk: &Pk);
    /// `resetCOS()`: clears commitments, openings and shares; certificates
    /// are retained.
    fn reset_cos(&mut self);
    /// `setEpochOrSlot(pos)`: advances the logical clock. Must be
    /// monotonically non-decreasing; a regression is a driver bug, logged
    /// and ignored rather than panicking on attacker-adjacent input.
    fn set_epoch_or_slot(&mut self, pos: u64);
}

/// The straightforward in-memory [`Toss`] implementation: four maps plus
/// the epoch-or-slot counter.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InMemoryToss {
    commitments: CommitmentsMap,
    openings: OpeningsMap,
    shares: SharesMap,
    certificates: VssCertificatesMap,
    current_epoch_or_slot: u64,
}

impl InMemoryToss {
    /// An empty accumulator, as created at the start of an epoch.
    pub fn new() -> Self {
        InMemoryToss::default()
    }

    /// Start a fresh epoch, inheriting only `certificates` from `self`: the
    /// accumulator is created empty at the start of each epoch, except that
    /// certificates carry over across a rollover.
    pub fn rollover(&self) -> Self {
        InMemoryToss {
            commitments: CommitmentsMap::new(),
            openings: OpeningsMap::new(),
            shares: SharesMap::new(),
            certificates: self.certificates.clone(),
            current_epoch_or_slot: self.current_epoch_or_slot,
        }
    }

    /// Reconstruct from a persisted [`TossSnapshot`].
    pub fn from_snapshot(snapshot: TossSnapshot) -> Self {
        InMemoryToss {
            commitments: snapshot.commitments,
            openings: snapshot.openings,
            shares: snapshot.shares,
            certificates: snapshot.certificates,
            current_epoch_or_slot: snapshot.current_epoch_or_slot,
        }
    }

    /// Produce the serializable persistence-boundary view.
    pub fn snapshot(&self) -> TossSnapshot {
        TossSnapshot {
            schema_version: SCHEMA_VERSION,
            commitments: self.commitments.clone(),
            openings: self.openings.clone(),
            shares: self.shares.clone(),
            certificates: self.certificates.clone(),
            current_epoch_or_slot: self.current_epoch_or_slot,
        }
    }

    /// Reduce every currently-recorded opening to its [`crate::seed::FtsSeed`]
    /// contribution and XOR them together to produce the
    /// epoch's Follow-the-Satoshi seed.
    ///
    /// Only stakeholders with a recorded opening contribute directly; a
    /// stakeholder who committed but never opened still has a seed
    /// contribution, recoverable from a threshold of decrypted shares via
    /// [`crate::crypto::pvss::JubjubPvss::recover`] -- that reconstruction is
    /// the driver's responsibility (it alone knows which shares have been
    /// gossiped and decrypted), not this accumulator's.
    pub fn reduce_seed(&self) -> crate::seed::FtsSeed {
        self.openings
            .values()
            .map(|opening| crate::seed::FtsSeed::from_secret(&opening.secret.to_bytes()))
            .fold(crate::seed::FtsSeed::zero(), |acc, contribution| acc.xor(&contribution))
    }
}

impl TossRead for InMemoryToss {
    fn get_commitments(&self) -> &CommitmentsMap {
        &self.commitments
    }

    fn get_openings(&self) -> &OpeningsMap {
        &self.openings
    }

    fn get_shares(&self) -> &SharesMap {
        &self.shares
    }

    fn get_vss_certificates(&self) -> &VssCertificatesMap {
        &self.certificates
    }

    fn current_epoch_or_slot(&self) -> u64 {
        self.current_epoch_or_slot
    }
}

impl Toss for InMemoryToss {
    fn put_commitment(&mut self, pk: Pk, sc: SignedCommitment) {
        if self.commitments.insert(pk, sc).is_some() {
            debug!("overwrote an existing commitment for a stakeholder this epoch");
        }
    }

    fn put_opening(&mut self, pk: Pk, opening: Opening) {
        if self.openings.insert(pk, opening).is_some() {
            debug!("overwrote an existing opening for a stakeholder this epoch");
        }
    }

    fn put_shares(&mut self, pk: Pk, inner: BTreeMap<Pk, crate::messages::Share>) {
        self.shares.insert(pk, inner);
    }

    fn put_certificate(&mut self, pk: Pk, cert: VssCertificate) {
        self.certificates.insert(pk, cert);
    }

    fn del_commitment(&mut self, pk: &Pk) {
        self.commitments.remove(pk);
    }

    fn del_opening(&mut self, pk: &Pk) {
        self.openings.remove(pk);
    }

    fn del_shares(&mut self, pk: &Pk) {
        self.shares.remove(pk);
    }

    fn reset_cos(&mut self) {
        self.commitments.clear();
        self.openings.clear();
        self.shares.clear();
    }

    fn set_epoch_or_slot(&mut self, pos: u64) {
        if pos < self.current_epoch_or_slot {
            warn!(
                "ignoring non-monotonic setEpochOrSlot: {} < {}",
                pos, self.current_epoch_or_slot
            );
            return;
        }
        self.current_epoch_or_slot = pos;
    }
}

/// The serializable view of the Toss state exposed at the persistence
/// boundary: the four maps plus the logical clock, tagged with a numeric
/// schema version.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TossSnapshot {
    /// The schema tag this snapshot was encoded under.
    pub schema_version: u32,
    /// See [`InMemoryToss`].
    pub commitments: CommitmentsMap,
    /// See [`InMemoryToss`].
    pub openings: OpeningsMap,
    /// See [`InMemoryToss`].
    pub shares: SharesMap,
    /// See [`InMemoryToss`].
    pub certificates: VssCertificatesMap,
    /// See [`InMemoryToss`].
    pub current_epoch_or_slot: u64,
}

impl TossSnapshot {
    /// The schema tag this crate currently encodes snapshots under.
    pub const SCHEMA_VERSION: u32 = SCHEMA_VERSION;
}

/// One entry in a [`TransactionalToss`]'s undo journal: enough information
/// to reverse a single mutation against an `InMemoryToss`.
enum UndoEntry {
    RestoreCommitment(Pk, Option<SignedCommitment>),
    RestoreOpening(Pk, Option<Opening>),
    RestoreShares(Pk, Option<BTreeMap<Pk, crate::messages::Share>>),
    RestoreCertificate(Pk, Option<VssCertificate>),
    RestoreAll(InMemoryToss),
    RestoreEpochOrSlot(u64),
}

/// A journaling wrapper over `&mut InMemoryToss` that lets a driver apply a
/// block's operations optimistically and either [`TransactionalToss::commit`]
/// or [`TransactionalToss::rollback`] them atomically, expressed as a flat
/// undo log instead of a transformer stack.
pub struct TransactionalToss<'a> {
    inner: &'a mut InMemoryToss,
    journal: Vec<UndoEntry>,
}

impl<'a> TransactionalToss<'a> {
    /// Begin a transaction over `inner`.
    pub fn new(inner: &'a mut InMemoryToss) -> Self {
        TransactionalToss {
            inner,
            journal: Vec::new(),
        }
    }

    /// Discard the journal, keeping every mutation applied so far.
    pub fn commit(self) {
        // Dropping `self` without replaying the journal is the commit.
    }

    /// Replay the journal in reverse, undoing every mutation made through
    /// this transaction.
    pub fn rollback(self) {
        for entry in self.journal.into_iter().rev() {
            match entry {
                UndoEntry::RestoreCommitment(pk, Some(sc)) => {
                    self.inner.commitments.insert(pk, sc);
                }
                UndoEntry::RestoreCommitment(pk, None) => {
                    self.inner.commitments.remove(&pk);
                }
                UndoEntry::RestoreOpening(pk, Some(o)) => {
                    self.inner.openings.insert(pk, o);
                }
                UndoEntry::RestoreOpening(pk, None) => {
                    self.inner.openings.remove(&pk);
                }
                UndoEntry::RestoreShares(pk, Some(inner)) => {
                    self.inner.shares.insert(pk, inner);
                }
                UndoEntry::RestoreShares(pk, None) => {
                    self.inner.shares.remove(&pk);
                }
                UndoEntry::RestoreCertificate(pk, Some(cert)) => {
                    self.inner.certificates.insert(pk, cert);
                }
                UndoEntry::RestoreCertificate(pk, None) => {
                    self.inner.certificates.remove(&pk);
                }
                UndoEntry::RestoreAll(snapshot) => {
                    *self.inner = snapshot;
                }
                UndoEntry::RestoreEpochOrSlot(pos) => {
                    self.inner.current_epoch_or_slot = pos;
                }
            }
        }
    }
}

impl<'a> TossRead for TransactionalToss<'a> {
    fn get_commitments(&self) -> &CommitmentsMap {
        self.inner.get_commitments()
    }

    fn get_openings(&self) -> &OpeningsMap {
        self.inner.get_openings()
    }

    fn get_shares(&self) -> &SharesMap {
        self.inner.get_shares()
    }

    fn get_vss_certificates(&self) -> &VssCertificatesMap {
        self.inner.get_vss_certificates()
    }

    fn current_epoch_or_slot(&self) -> u64 {
        self.inner.current_epoch_or_slot()
    }
}

impl<'a> Toss for TransactionalToss<'a> {
    fn put_commitment(&mut self, pk: Pk, sc: SignedCommitment) {
        let previous = self.inner.commitments.insert(pk, sc);
        self.journal.push(UndoEntry::RestoreCommitment(pk, previous));
    }

    fn put_opening(&mut self, pk: Pk, opening: Opening) {
        let previous = self.inner.openings.insert(pk, opening);
        self.journal.push(UndoEntry::RestoreOpening(pk, previous));
    }

    fn put_shares(&mut self, pk: Pk, inner: BTreeMap<Pk, crate::messages::Share>) {
        let previous = self.inner.shares.insert(pk, inner);
        self.journal.push(UndoEntry::RestoreShares(pk, previous));
    }

    fn put_certificate(&mut self, pk: Pk, cert: VssCertificate) {
        let previous = self.inner.certificates.insert(pk, cert);
        self.journal.push(UndoEntry::RestoreCertificate(pk, previous));
    }

    fn del_commitment(&mut self, pk: &Pk) {
        let previous = self.inner.commitments.remove(pk);
        self.journal.push(UndoEntry::RestoreCommitment(*pk, previous));
    }

    fn del_opening(&mut self, pk: &Pk) {
        let previous = self.inner.openings.remove(pk);
        self.journal.push(UndoEntry::RestoreOpening(*pk, previous));
    }

    fn del_shares(&mut self, pk: &Pk) {
        let previous = self.inner.shares.remove(pk);
        self.journal.push(UndoEntry::RestoreShares(*pk, previous));
    }

    fn reset_cos(&mut self) {
        self.journal.push(UndoEntry::RestoreAll(self.inner.clone()));
        self.inner.reset_cos();
    }

    fn set_epoch_or_slot(&mut self, pos: u64) {
        let previous = self.inner.current_epoch_or_slot;
        self.inner.set_epoch_or_slot(pos);
        self.journal.push(UndoEntry::RestoreEpochOrSlot(previous));
    }
}
