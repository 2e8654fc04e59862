use crate::window::KpiWindow;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The key performance indicators tracked for an account.
///
/// The declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kpi {
    TotalPosts,
    FollowersGained,
    TotalReach,
    TotalLikes,
    TotalComments,
    LikeRate,
    AverageReach,
    AverageLikes,
}

impl Kpi {
    pub const ALL: [Kpi; 8] = [
        Kpi::TotalPosts,
        Kpi::FollowersGained,
        Kpi::TotalReach,
        Kpi::TotalLikes,
        Kpi::TotalComments,
        Kpi::LikeRate,
        Kpi::AverageReach,
        Kpi::AverageLikes,
    ];

    /// The snake_case field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kpi::TotalPosts => "total_posts",
            Kpi::FollowersGained => "followers_gained",
            Kpi::TotalReach => "total_reach",
            Kpi::TotalLikes => "total_likes",
            Kpi::TotalComments => "total_comments",
            Kpi::LikeRate => "like_rate",
            Kpi::AverageReach => "average_reach",
            Kpi::AverageLikes => "average_likes",
        }
    }

    /// A human-readable label for tables.
    pub fn label(&self) -> &'static str {
        match self {
            Kpi::TotalPosts => "Total Posts",
            Kpi::FollowersGained => "Followers Gained",
            Kpi::TotalReach => "Total Reach",
            Kpi::TotalLikes => "Total Likes",
            Kpi::TotalComments => "Total Comments",
            Kpi::LikeRate => "Like Rate",
            Kpi::AverageReach => "Avg Reach / Post",
            Kpi::AverageLikes => "Avg Likes / Post",
        }
    }
}

impl fmt::Display for Kpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered `(Kpi, value)` pairs, serialized as a map in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Fields(Vec<(Kpi, Option<Decimal>)>);

impl Fields {
    fn with_capacity(capacity: usize) -> Self {
        Fields(Vec::with_capacity(capacity))
    }

    fn upsert(&mut self, kpi: Kpi, value: Option<Decimal>) {
        match self.0.iter_mut().find(|(k, _)| *k == kpi) {
            Some(field) => field.1 = value,
            None => self.0.push((kpi, value)),
        }
    }

    fn get(&self, kpi: Kpi) -> Option<Decimal> {
        self.0.iter().find(|(k, _)| *k == kpi).and_then(|(_, v)| *v)
    }

    fn contains(&self, kpi: Kpi) -> bool {
        self.0.iter().any(|(k, _)| *k == kpi)
    }

    fn kpis(&self) -> impl Iterator<Item = Kpi> + '_ {
        self.0.iter().map(|(k, _)| *k)
    }

    fn iter(&self) -> impl Iterator<Item = (Kpi, Option<Decimal>)> + '_ {
        self.0.iter().copied()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (kpi, value) in &self.0 {
            map.serialize_entry(kpi.as_str(), value)?;
        }
        map.end()
    }
}

/// An ordered record of KPI values for one window.
///
/// A `KpiSet` produced by the `AnalyticsEngine` always carries every `Kpi` in
/// canonical order. Hand-built sets may carry any subset, which is what the
/// delta reporter compares. A field can be present with a missing (`None`)
/// value, which is distinct from the field not being part of the set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct KpiSet {
    fields: Fields,
}

impl KpiSet {
    /// Creates an empty set with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete set with every KPI at zero.
    pub fn zeroed() -> Self {
        Kpi::ALL
            .iter()
            .fold(Self::new(), |set, kpi| set.with(*kpi, Decimal::ZERO))
    }

    /// Builder form of [`KpiSet::insert`].
    pub fn with(mut self, kpi: Kpi, value: impl Into<Option<Decimal>>) -> Self {
        self.insert(kpi, value);
        self
    }

    /// Sets a field, appending it if the set does not carry it yet.
    pub fn insert(&mut self, kpi: Kpi, value: impl Into<Option<Decimal>>) {
        self.fields.upsert(kpi, value.into());
    }

    /// The value of a field, or `None` when it is missing or not part of the set.
    pub fn get(&self, kpi: Kpi) -> Option<Decimal> {
        self.fields.get(kpi)
    }

    pub fn contains(&self, kpi: Kpi) -> bool {
        self.fields.contains(kpi)
    }

    /// The fields carried by this set, in order.
    pub fn kpis(&self) -> impl Iterator<Item = Kpi> + '_ {
        self.fields.kpis()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Kpi, Option<Decimal>)> + '_ {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.0.is_empty()
    }
}

/// The percentage change of each field between two `KpiSet`s.
///
/// `Some(0)` means the values were equal. `None` means the change is undefined:
/// a side was missing, or the previous value was zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct DeltaSet {
    fields: Fields,
}

impl DeltaSet {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Fields::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, kpi: Kpi, delta: Option<Decimal>) {
        self.fields.upsert(kpi, delta);
    }

    /// The percentage change of a field, or `None` when undefined or absent.
    pub fn get(&self, kpi: Kpi) -> Option<Decimal> {
        self.fields.get(kpi)
    }

    /// Whether the field was compared at all, defined or not.
    pub fn contains(&self, kpi: Kpi) -> bool {
        self.fields.contains(kpi)
    }

    pub fn kpis(&self) -> impl Iterator<Item = Kpi> + '_ {
        self.fields.kpis()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Kpi, Option<Decimal>)> + '_ {
        self.fields.iter()
    }
}

/// Everything the account overview shows: both windows, their KPIs and the
/// change between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountOverview {
    pub current_window: KpiWindow,
    pub previous_window: KpiWindow,
    pub current: KpiSet,
    pub previous: KpiSet,
    pub deltas: DeltaSet,
}
