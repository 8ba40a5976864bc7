//! Grouping observables that can be measured with one circuit
//!
//! Observables commuting qubit by qubit share a measurement basis: on each
//! qubit they either act trivially or apply the same Pauli. One circuit
//! measuring that basis yields the eigenvalues of every member of the group.

use crate::error::{CuttingError, Result};
use ahash::AHashMap;
use qknit_state::{Pauli, PauliList, PauliString};

/// Maximum number of measured qubits per group, one outcome bit each
const MAX_MEASURED_QUBITS: usize = 64;

/// Observables sharing a measurement basis
#[derive(Debug, Clone, PartialEq)]
pub struct CommutingObservableGroup {
    general_observable: PauliString,
    commuting_observables: Vec<PauliString>,
    pauli_indices: Vec<usize>,
    pauli_bitmasks: Vec<u64>,
}

impl CommutingObservableGroup {
    /// Create a group measured in the basis of `general_observable`
    ///
    /// # Errors
    /// Returns error if an observable has a different qubit count than the
    /// general observable, or acts on some qubit with a Pauli the general
    /// observable does not measure
    pub fn new(general_observable: PauliString, commuting_observables: Vec<PauliString>) -> Result<Self> {
        let pauli_indices = general_observable.support();
        if pauli_indices.len() > MAX_MEASURED_QUBITS {
            return Err(CuttingError::InvalidObservableGroup(format!(
                "cannot measure {} qubits at once; the limit is {}",
                pauli_indices.len(),
                MAX_MEASURED_QUBITS
            )));
        }

        let mut pauli_bitmasks = Vec::with_capacity(commuting_observables.len());
        for observable in &commuting_observables {
            if observable.num_qubits() != general_observable.num_qubits() {
                return Err(CuttingError::InvalidObservableGroup(format!(
                    "{} acts on {} qubit(s) but the general observable {} acts on {}",
                    observable,
                    observable.num_qubits(),
                    general_observable,
                    general_observable.num_qubits()
                )));
            }
            let measured = observable
                .paulis()
                .iter()
                .zip(general_observable.paulis())
                .all(|(&p, &g)| p == Pauli::I || p == g);
            if !measured {
                return Err(CuttingError::InvalidObservableGroup(format!(
                    "{} is not measured by the general observable {}",
                    observable, general_observable
                )));
            }

            pauli_bitmasks.push(measured_bits(&pauli_indices, observable));
        }

        Ok(Self {
            general_observable,
            commuting_observables,
            pauli_indices,
            pauli_bitmasks,
        })
    }

    /// Observable whose eigenbasis is measured
    pub fn general_observable(&self) -> &PauliString {
        &self.general_observable
    }

    pub fn commuting_observables(&self) -> &[PauliString] {
        &self.commuting_observables
    }

    /// Qubits the general observable acts on, ascending; measured bit `j`
    /// holds qubit `pauli_indices[j]`
    pub fn pauli_indices(&self) -> &[usize] {
        &self.pauli_indices
    }

    /// Per observable, the measured bits it depends on
    pub fn pauli_bitmasks(&self) -> &[u64] {
        &self.pauli_bitmasks
    }
}

/// Observables split into qubit-wise commuting groups
///
/// # Example
/// ```
/// use qknit_cutting::ObservableCollection;
/// use qknit_state::PauliList;
///
/// let observables = PauliList::from_labels(&["ZZ", "ZI", "XX"]).unwrap();
/// let collection = ObservableCollection::new(&observables).unwrap();
/// assert_eq!(collection.groups().len(), 2);
/// assert_eq!(collection.lookup(observables.get(2).unwrap()), Some(&[(1, 0)][..]));
/// ```
#[derive(Debug, Clone)]
pub struct ObservableCollection {
    groups: Vec<CommutingObservableGroup>,
    lookup: AHashMap<PauliString, Vec<(usize, usize)>>,
}

impl ObservableCollection {
    /// Group `observables`, ignoring phases and repeats
    ///
    /// Each observable joins the first group it commutes with qubit-wise,
    /// or opens a new group.
    ///
    /// # Errors
    /// Returns error if a group would measure more than 64 qubits
    pub fn new(observables: &PauliList) -> Result<Self> {
        let mut members: Vec<Vec<PauliString>> = Vec::new();
        let mut generals: Vec<Vec<Pauli>> = Vec::new();
        let mut lookup: AHashMap<PauliString, Vec<(usize, usize)>> = AHashMap::new();

        for observable in observables {
            let observable = observable.without_phase();
            if lookup.contains_key(&observable) {
                continue;
            }
            let group = generals.iter().position(|general| {
                general
                    .iter()
                    .zip(observable.paulis())
                    .all(|(&g, &p)| g == Pauli::I || p == Pauli::I || g == p)
            });
            let group = match group {
                Some(group) => group,
                None => {
                    generals.push(vec![Pauli::I; observable.num_qubits()]);
                    members.push(Vec::new());
                    generals.len() - 1
                }
            };
            for (g, &p) in generals[group].iter_mut().zip(observable.paulis()) {
                if p != Pauli::I {
                    *g = p;
                }
            }
            lookup.insert(observable.clone(), vec![(group, members[group].len())]);
            members[group].push(observable);
        }

        let groups = generals
            .into_iter()
            .zip(members)
            .map(|(general, commuting)| CommutingObservableGroup::new(PauliString::from_paulis(general), commuting))
            .collect::<Result<_>>()?;

        Ok(Self { groups, lookup })
    }

    pub fn groups(&self) -> &[CommutingObservableGroup] {
        &self.groups
    }

    /// `(group, index)` positions holding `observable`, phase ignored
    pub fn lookup(&self, observable: &PauliString) -> Option<&[(usize, usize)]> {
        if observable.has_unit_phase() {
            self.lookup.get(observable).map(Vec::as_slice)
        } else {
            self.lookup.get(&observable.without_phase()).map(Vec::as_slice)
        }
    }
}

/// Bit `j` set when `observable` acts on qubit `pauli_indices[j]`
fn measured_bits(pauli_indices: &[usize], observable: &PauliString) -> u64 {
    pauli_indices
        .iter()
        .enumerate()
        .filter(|&(_, &qubit)| observable.paulis()[qubit] != Pauli::I)
        .fold(0, |mask, (bit, _)| mask | (1 << bit))
}
