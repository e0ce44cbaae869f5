//! Individual resident records and the roster that holds them.

use std::collections::HashMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::events::{DepartureReason, EvictionReason};
use crate::rng::SimRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DenizenId(u64);

impl DenizenId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DenizenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Cheerful,
    Grumpy,
    Anxious,
    Civic,
    Snarky,
}

impl Personality {
    pub const ALL: [Personality; 5] = [
        Personality::Cheerful,
        Personality::Grumpy,
        Personality::Anxious,
        Personality::Civic,
        Personality::Snarky,
    ];

    /// How this personality responds to a post of the given sentiment.
    pub fn stance(self, sentiment: Sentiment) -> Stance {
        use Personality::*;
        use Sentiment::*;
        match (self, sentiment) {
            (Cheerful, Praise) => Stance::Amplify,
            (Cheerful, Complaint) => Stance::Console,
            (Cheerful, Neutral) => Stance::Echo,
            (Grumpy, Praise) => Stance::Rebut,
            (Grumpy, Complaint) => Stance::Amplify,
            (Grumpy, Neutral) => Stance::Ignore,
            (Anxious, Praise) => Stance::Ignore,
            (Anxious, Complaint) => Stance::Amplify,
            (Anxious, Neutral) => Stance::Echo,
            (Civic, Praise) => Stance::Echo,
            (Civic, Complaint) => Stance::Console,
            (Civic, Neutral) => Stance::Echo,
            (Snarky, Praise) => Stance::Rebut,
            (Snarky, Complaint) => Stance::Rebut,
            (Snarky, Neutral) => Stance::Ignore,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Praise,
    Complaint,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Amplify,
    Echo,
    Console,
    Rebut,
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeEvent {
    pub tick: u64,
    pub kind: LifeEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifeEventKind {
    MovedIn { home: Address, drift: bool },
    Moved { from: Address, to: Address },
    Hired { work: Address },
    Fired { work: Address },
    LaidOff { work: Address },
    WorkplaceDemolished { work: Address },
    LeftCity { reason: DepartureReason },
    Evicted { reason: EvictionReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denizen {
    pub id: DenizenId,
    pub name: String,
    pub home: Option<Address>,
    pub work: Option<Address>,
    pub since: u64,
    history: Vec<LifeEvent>,
    pub days_missed: u32,
    pub unemployed_days: u32,
    left: Option<u64>,
    pub personality: Personality,
}

impl Denizen {
    pub fn is_active(&self) -> bool {
        self.left.is_none()
    }

    pub fn left(&self) -> Option<u64> {
        self.left
    }

    pub fn history(&self) -> &[LifeEvent] {
        &self.history
    }

    pub fn record(&mut self, tick: u64, kind: LifeEventKind) {
        self.history.push(LifeEvent { tick, kind });
    }

    /// Marks the record historical. A second call keeps the first tick.
    pub fn mark_left(&mut self, tick: u64, kind: LifeEventKind) {
        if self.left.is_none() {
            self.left = Some(tick);
            self.record(tick, kind);
        }
    }

    pub fn lives_at(&self, address: &Address) -> bool {
        self.is_active() && self.home.as_ref() == Some(address)
    }

    pub fn works_at(&self, address: &Address) -> bool {
        self.is_active() && self.work.as_ref() == Some(address)
    }

    pub fn assign_job(&mut self, tick: u64, work: Address) {
        self.work = Some(work.clone());
        self.unemployed_days = 0;
        self.days_missed = 0;
        self.record(tick, LifeEventKind::Hired { work });
    }

    /// Clears the job and logs why. Returns the workplace that was lost.
    pub fn lose_job(
        &mut self,
        tick: u64,
        kind: impl FnOnce(Address) -> LifeEventKind,
    ) -> Option<Address> {
        let work = self.work.take()?;
        self.days_missed = 0;
        self.record(tick, kind(work.clone()));
        Some(work)
    }
}

/// Every denizen ever created, active or not, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    denizens: Vec<Denizen>,
    next_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.denizens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.denizens.is_empty()
    }

    pub fn all(&self) -> &[Denizen] {
        &self.denizens
    }

    /// Ids are handed out in creation order and nobody is ever removed, so
    /// an id is also the denizen's index.
    pub fn get(&self, id: DenizenId) -> Option<&Denizen> {
        self.denizens.get(id.0 as usize).filter(|d| d.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: DenizenId) -> Option<&mut Denizen> {
        self.denizens.get_mut(id.0 as usize).filter(|d| d.id == id)
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut Denizen> {
        self.denizens.iter_mut()
    }

    pub fn active(&self) -> impl Iterator<Item = &Denizen> {
        self.denizens.iter().filter(|d| d.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// First active denizen living at `home`, in roster order.
    pub fn first_resident(&self, home: &Address) -> Option<DenizenId> {
        self.active().find(|d| d.home.as_ref() == Some(home)).map(|d| d.id)
    }

    pub fn residents_of(&self, home: &Address) -> Vec<DenizenId> {
        self.active()
            .filter(|d| d.home.as_ref() == Some(home))
            .map(|d| d.id)
            .collect()
    }

    pub fn workers_of(&self, work: &Address) -> Vec<DenizenId> {
        self.active()
            .filter(|d| d.work.as_ref() == Some(work))
            .map(|d| d.id)
            .collect()
    }

    pub fn count_by_home(&self) -> HashMap<Address, u32> {
        let mut counts = HashMap::new();
        for denizen in self.active() {
            if let Some(home) = &denizen.home {
                *counts.entry(home.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn count_by_work(&self) -> HashMap<Address, u32> {
        let mut counts = HashMap::new();
        for denizen in self.active() {
            if let Some(work) = &denizen.work {
                *counts.entry(work.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Creates a denizen at `home`, logs the move-in and returns its id.
    pub fn admit(
        &mut self,
        rng: &mut dyn SimRng,
        tick: u64,
        home: Address,
        drift: bool,
    ) -> DenizenId {
        let id = DenizenId(self.next_id);
        self.next_id += 1;
        let personality = Personality::ALL
            .choose(rng)
            .copied()
            .unwrap_or(Personality::Civic);
        let mut denizen = Denizen {
            id,
            name: generate_name(rng),
            home: Some(home.clone()),
            work: None,
            since: tick,
            history: Vec::new(),
            days_missed: 0,
            unemployed_days: 0,
            left: None,
            personality,
        };
        denizen.record(tick, LifeEventKind::MovedIn { home, drift });
        self.denizens.push(denizen);
        id
    }
}

const NAME_PREFIXES: [&str; 10] = [
    "Urban", "City", "Metro", "Town", "Village", "Street", "Road", "Lane", "Park", "Zone",
];

const NAME_SUFFIXES: [&str; 10] = [
    "Planner", "Dweller", "Sim", "Citizen", "Neighbor", "Walker", "Driver", "Builder", "Fan",
    "Critic",
];

fn generate_name(rng: &mut dyn SimRng) -> String {
    let prefix = NAME_PREFIXES.choose(rng).copied().unwrap_or("City");
    let suffix = NAME_SUFFIXES.choose(rng).copied().unwrap_or("Sim");
    format!("{prefix}{suffix}{}", rng.gen_range(0..1000u32))
}
