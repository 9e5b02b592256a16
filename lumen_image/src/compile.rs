//! Fixed-point compilation of a configuration graph into an EEPROM image.

use std::mem;

use lumen_config::{Config, ObjectId, ObjectKind, Pool};

use crate::{
    layout::{config_header, object_bytes, CONFIG_HEADER_LEN},
    Address, CompileError,
};

/// Addresses assigned to pool objects during one compile, keyed by id.
///
/// A fresh all-`None` table per compile is what resets every object's address
/// before resolution starts; the pool itself is never mutated.
#[derive(Debug)]
pub(crate) struct AddressTable {
    slots: Vec<Option<Address>>,
}

impl AddressTable {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// The address assigned to `id`, or `None` if it is unassigned or the id
    /// does not name a pool object.
    pub(crate) fn get(&self, id: ObjectId) -> Option<Address> {
        self.slots.get(id.0).copied().flatten()
    }

    pub(crate) fn set(&mut self, id: ObjectId, address: Address) {
        self.slots[id.0] = Some(address);
    }
}

/// An object already emitted into the image, kept for structural equality
/// checks against later objects.
struct Compiled {
    kind: mem::Discriminant<ObjectKind>,
    address: Address,
    bytes: Vec<u8>,
}

/// The reachable object set in first-discovery order, visiting every shared
/// object exactly once by id.
fn reachable(pool: &Pool, config: &Config) -> Vec<ObjectId> {
    let mut order = Vec::new();
    let mut seen = vec![false; pool.len()];
    let mut stack: Vec<ObjectId> = config.refs().iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        let object = match pool.get(id) {
            Some(object) => object,
            None => continue,
        };
        if mem::replace(&mut seen[id.0], true) {
            continue;
        }
        order.push(id);
        for child in object.kind.refs().iter().rev() {
            stack.push(*child);
        }
    }
    order
}

/// Compile the graph rooted at `config` into a flat image.
///
/// Objects are resolved by repeated passes over the not-yet-addressed set:
/// an object is ready once everything it references has an address, and a
/// ready object whose kind and serialized bytes match an already-emitted one
/// aliases that object's address instead of emitting bytes of its own. A pass
/// that resolves nothing fails with [CompileError::GraphUnresolvable], so a
/// reference cycle cannot hang the compile.
///
/// Addresses embedded in the image are `base_address` plus the object's
/// offset in the output buffer. The finished image either fits
/// `size_budget` or the compile fails with no output.
pub fn compile(
    pool: &Pool,
    config: &Config,
    base_address: Address,
    size_budget: usize,
) -> Result<Vec<u8>, CompileError> {
    let mut addresses = AddressTable::new(pool.len());
    let mut uncompiled = reachable(pool, config);
    log::debug!("compiling {} reachable object(s)", uncompiled.len());

    let mut image = vec![0u8; CONFIG_HEADER_LEN];
    let mut compiled: Vec<Compiled> = Vec::new();
    let mut passes = 0;
    while !uncompiled.is_empty() {
        passes += 1;
        let mut deferred = Vec::new();
        let mut resolved = 0usize;
        for &id in &uncompiled {
            let object = pool.get(id).expect("reachable ids name pool objects");
            let ready = object
                .kind
                .refs()
                .iter()
                .all(|child| addresses.get(*child).is_some());
            if !ready {
                deferred.push(id);
                continue;
            }
            let bytes = object_bytes(&object.kind, &addresses)?;
            let kind = mem::discriminant(&object.kind);
            let twin = compiled
                .iter()
                .find(|other| other.kind == kind && other.bytes == bytes);
            match twin {
                Some(twin) => addresses.set(id, twin.address),
                None => {
                    let address = base_address + image.len();
                    addresses.set(id, address);
                    image.extend_from_slice(&bytes);
                    compiled.push(Compiled {
                        kind,
                        address,
                        bytes,
                    });
                }
            }
            resolved += 1;
        }
        if resolved == 0 {
            return Err(CompileError::GraphUnresolvable);
        }
        log::debug!(
            "pass {}: resolved {} object(s), {} deferred",
            passes,
            resolved,
            deferred.len()
        );
        uncompiled = deferred;
    }

    let header = config_header(config, &addresses)?;
    image[..CONFIG_HEADER_LEN].copy_from_slice(&header);

    if image.len() > size_budget {
        return Err(CompileError::ImageTooLarge {
            size: image.len(),
            budget: size_budget,
        });
    }
    log::info!(
        "compiled image: {} bytes, {} object(s) emitted in {} pass(es)",
        image.len(),
        compiled.len(),
        passes
    );
    Ok(image)
}
