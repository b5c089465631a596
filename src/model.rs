//! Core data models for Forgenite Frenzy.
//! The whole game lives in one `GameState` aggregate; the lookup tables below
//! (ranks, leagues, commanders, quests, achievements, battle pass tiers) are
//! static data the reducer consults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

// ---------------- Player -----------------

/// Payload of `InitPlayer`, produced by the setup screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub name: String,
    pub commander_id: String,
    pub level: u32,
    pub experience: f64,
    pub points: f64,
    pub total_points: f64,
}

impl PlayerData {
    pub fn new(name: impl Into<String>, commander_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commander_id: commander_id.into(),
            level: 1,
            experience: 0.0,
            points: 0.0,
            total_points: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum League {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Grandmaster,
}

const LEAGUE_THRESHOLDS: &[(f64, League)] = &[
    (5_000_000.0, League::Grandmaster),
    (1_500_000.0, League::Master),
    (500_000.0, League::Diamond),
    (150_000.0, League::Platinum),
    (50_000.0, League::Gold),
    (10_000.0, League::Silver),
];

impl League {
    pub fn for_points(total_points: f64) -> League {
        LEAGUE_THRESHOLDS
            .iter()
            .find(|(min, _)| total_points >= *min)
            .map(|(_, l)| *l)
            .unwrap_or(League::Bronze)
    }

    pub fn name(self) -> &'static str {
        match self {
            League::Bronze => "Bronze",
            League::Silver => "Silver",
            League::Gold => "Gold",
            League::Platinum => "Platinum",
            League::Diamond => "Diamond",
            League::Master => "Master",
            League::Grandmaster => "Grandmaster",
        }
    }
}

const RANKS: &[(u32, &str)] = &[
    (75, "Master"),
    (50, "General"),
    (35, "Commander"),
    (25, "Captain"),
    (15, "Lieutenant"),
    (10, "Sergeant"),
    (5, "Soldier"),
];

pub fn rank_for_level(level: u32) -> &'static str {
    RANKS
        .iter()
        .find(|(min, _)| level >= *min)
        .map(|(_, r)| *r)
        .unwrap_or("Recruit")
}

/// Experience needed to leave `level`: `floor(100 * 1.5^(level-1))`.
pub fn experience_for_level(level: u32) -> f64 {
    let exp = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    (100.0 * 1.5_f64.powi(exp)).floor().min(f64::MAX)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub commander_id: String,
    pub unlocked_commanders: BTreeSet<String>,
    pub titles: BTreeSet<String>,
    pub is_wallet_connected: bool,
    pub wallet_address: Option<String>,

    pub level: u32,
    #[serde(alias = "xp")]
    pub experience: f64,
    #[serde(alias = "experienceToNext", alias = "xpToNextLevel")]
    pub experience_to_next: f64,
    #[serde(alias = "rank")]
    pub rank_title: String,
    pub league: League,
    #[serde(alias = "totalPoints")]
    pub total_points: f64,
    /// Premium currency; only ever granted or spent by actions, never derived.
    pub auron: u64,

    /// Remaining taps in the current allowance, clamped to `[0, max_taps]`.
    pub current_taps: u32,
    pub max_taps: u32,
    /// When an exhausted allowance refills (ms since epoch).
    pub taps_available_at: f64,

    pub total_taps: u64,
    pub total_crits: u64,
    pub longest_streak: u32,

    pub active_tap_bonuses: Vec<ActiveTapBonus>,
}

impl PlayerProfile {
    pub fn from_data(data: PlayerData, max_taps: u32) -> Self {
        let level = data.level.max(1);
        let mut unlocked_commanders: BTreeSet<String> = commanders_for_level(level)
            .map(|c| c.id.to_string())
            .collect();
        unlocked_commanders.insert(data.commander_id.clone());
        Self {
            name: data.name,
            commander_id: data.commander_id,
            unlocked_commanders,
            titles: BTreeSet::new(),
            is_wallet_connected: false,
            wallet_address: None,
            level,
            experience: data.experience.max(0.0),
            experience_to_next: experience_for_level(level),
            rank_title: rank_for_level(level).to_string(),
            league: League::for_points(data.total_points),
            total_points: data.total_points,
            auron: 0,
            current_taps: max_taps,
            max_taps,
            taps_available_at: 0.0,
            total_taps: 0,
            total_crits: 0,
            longest_streak: 0,
            active_tap_bonuses: Vec::new(),
        }
    }

    /// A tap is accepted while taps remain or once the refill time has passed.
    pub fn can_tap(&self, now_ms: f64) -> bool {
        self.current_taps > 0 || now_ms >= self.taps_available_at
    }

    /// Product of every active bonus multiplier (1.0 when none).
    pub fn bonus_multiplier(&self) -> f64 {
        self.active_tap_bonuses.iter().map(|b| b.multiplier).product()
    }
}

// ---------------- Commanders -----------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CommanderDef {
    pub id: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub unlock_level: u32,
}

pub const COMMANDERS: &[CommanderDef] = &[
    CommanderDef { id: "valkyr", name: "Valkyr", title: "Commander of the Forge", unlock_level: 1 },
    CommanderDef { id: "zenith", name: "Zenith", title: "Supreme Forge Architect", unlock_level: 10 },
    CommanderDef { id: "nova", name: "Nova", title: "Stellar Strategist", unlock_level: 25 },
    CommanderDef { id: "forge", name: "Forge", title: "Master of Creation", unlock_level: 50 },
];

pub fn commander(id: &str) -> Option<&'static CommanderDef> {
    COMMANDERS.iter().find(|c| c.id == id)
}

pub fn commanders_for_level(level: u32) -> impl Iterator<Item = &'static CommanderDef> {
    COMMANDERS.iter().filter(move |c| c.unlock_level <= level)
}

// ---------------- Quests -----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestKind {
    Taps,
    PointsEarned,
    Criticals,
    DronesBought,
    ReachLevel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestReward {
    pub points: f64,
    pub auron: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuestTemplate {
    pub template_id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: QuestKind,
    pub target: f64,
    pub reward: QuestReward,
}

pub const QUEST_TEMPLATES: &[QuestTemplate] = &[
    QuestTemplate {
        template_id: "daily_taps",
        title: "Tap the Commander",
        description: "Tap the commander 100 times",
        kind: QuestKind::Taps,
        target: 100.0,
        reward: QuestReward { points: 500.0, auron: 0 },
    },
    QuestTemplate {
        template_id: "daily_points",
        title: "Gather Resources",
        description: "Earn 10,000 points",
        kind: QuestKind::PointsEarned,
        target: 10_000.0,
        reward: QuestReward { points: 750.0, auron: 0 },
    },
    QuestTemplate {
        template_id: "daily_criticals",
        title: "Critical Strikes",
        description: "Land 25 critical hits",
        kind: QuestKind::Criticals,
        target: 25.0,
        reward: QuestReward { points: 1000.0, auron: 5 },
    },
    QuestTemplate {
        template_id: "daily_drones",
        title: "Drone Fleet",
        description: "Buy 3 M.U.L.E. drones",
        kind: QuestKind::DronesBought,
        target: 3.0,
        reward: QuestReward { points: 0.0, auron: 10 },
    },
    QuestTemplate {
        template_id: "daily_level",
        title: "Rising Officer",
        description: "Reach level 5",
        kind: QuestKind::ReachLevel,
        target: 5.0,
        reward: QuestReward { points: 250.0, auron: 0 },
    },
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyQuest {
    /// Instance id, `"{template_id}-{issued_at}"`.
    pub id: String,
    pub template_id: String,
    pub title: String,
    pub description: String,
    pub kind: QuestKind,
    pub progress: f64,
    pub target: f64,
    pub reward: QuestReward,
    /// Latched once the reward is granted; only a quest refresh clears it.
    #[serde(default, alias = "isClaimed")]
    pub is_claimed: bool,
}

impl DailyQuest {
    pub fn issue(template: &QuestTemplate, issued_at: f64) -> Self {
        Self {
            id: format!("{}-{}", template.template_id, issued_at as u64),
            template_id: template.template_id.to_string(),
            title: template.title.to_string(),
            description: template.description.to_string(),
            kind: template.kind,
            progress: 0.0,
            target: template.target,
            reward: template.reward,
            is_claimed: false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.progress >= self.target
    }

    pub fn is_claimable(&self) -> bool {
        self.is_completed() && !self.is_claimed
    }
}

pub fn issue_daily_quests(now_ms: f64) -> Vec<DailyQuest> {
    QUEST_TEMPLATES
        .iter()
        .map(|t| DailyQuest::issue(t, now_ms))
        .collect()
}

// ---------------- Achievements -----------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AchievementGoal {
    FirstTap,
    ReachLevel(u32),
    TotalPoints(f64),
    FirstDrone,
    Criticals(u32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub goal: AchievementGoal,
}

pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "first_tap",
        title: "First Touch",
        description: "Tap the commander for the first time",
        goal: AchievementGoal::FirstTap,
    },
    AchievementDef {
        id: "level_5",
        title: "Level 5",
        description: "Reach level 5",
        goal: AchievementGoal::ReachLevel(5),
    },
    AchievementDef {
        id: "points_1000",
        title: "A Thousand Points",
        description: "Earn 1,000 points in total",
        goal: AchievementGoal::TotalPoints(1000.0),
    },
    AchievementDef {
        id: "first_drone",
        title: "First Drone",
        description: "Buy your first M.U.L.E. drone",
        goal: AchievementGoal::FirstDrone,
    },
    AchievementDef {
        id: "critical_master",
        title: "Critical Master",
        description: "Land 100 critical hits",
        goal: AchievementGoal::Criticals(100),
    },
];

pub fn achievement_def(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub unlocked: bool,
    #[serde(default, alias = "unlockedAt")]
    pub unlocked_at: Option<f64>,
}

impl From<&AchievementDef> for Achievement {
    fn from(def: &AchievementDef) -> Self {
        Self {
            id: def.id.to_string(),
            title: def.title.to_string(),
            description: def.description.to_string(),
            unlocked: false,
            unlocked_at: None,
        }
    }
}

// ---------------- Battle pass -----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardTrack {
    Free,
    Premium,
}

impl RewardTrack {
    pub fn reward_id(self, level: u32) -> String {
        match self {
            RewardTrack::Free => format!("{level}:free"),
            RewardTrack::Premium => format!("{level}:premium"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BattlePassReward {
    Points(f64),
    Auron(u64),
    Title(String),
}

/// Rewards for one tier of one track.
pub fn battle_pass_rewards(level: u32, track: RewardTrack) -> Vec<BattlePassReward> {
    match track {
        RewardTrack::Free => vec![BattlePassReward::Points(100.0 * level as f64)],
        RewardTrack::Premium => {
            let mut rewards = vec![BattlePassReward::Auron(5 * level as u64)];
            if level % 10 == 0 {
                rewards.push(BattlePassReward::Title(format!("Vanguard {}", level / 10)));
            }
            rewards
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattlePassProgress {
    pub level: u32,
    pub experience: f64,
    #[serde(alias = "experienceToNext")]
    pub experience_to_next: f64,
    #[serde(alias = "premiumTrackUnlocked")]
    pub premium_track_unlocked: bool,
    #[serde(alias = "rewardsClaimed")]
    pub rewards_claimed: BTreeSet<String>,
}

impl BattlePassProgress {
    pub fn new(xp_step: f64) -> Self {
        Self {
            level: 1,
            experience: 0.0,
            experience_to_next: xp_step,
            premium_track_unlocked: false,
            rewards_claimed: BTreeSet::new(),
        }
    }

    fn has_unclaimed(&self, level: u32) -> bool {
        !self.rewards_claimed.contains(&RewardTrack::Free.reward_id(level))
            || (self.premium_track_unlocked
                && !self.rewards_claimed.contains(&RewardTrack::Premium.reward_id(level)))
    }

    /// At most `count` tiers starting at the lowest one with something left to
    /// claim, never past the next unreached tier.
    pub fn visible_tiers(&self, count: u32) -> RangeInclusive<u32> {
        let last = self.level.saturating_add(1);
        let mut start = 1;
        while start < last && !self.has_unclaimed(start) {
            start += 1;
        }
        let end = start.saturating_add(count.saturating_sub(1)).min(last);
        start..=end
    }
}

// ---------------- Marketplace -----------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceItem {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(alias = "costAuron", alias = "costInAuron")]
    pub cost_auron: u64,
    #[serde(alias = "durationTaps", alias = "duration")]
    pub duration_taps: u32,
    pub multiplier: f64,
}

pub fn marketplace_catalog() -> Vec<MarketplaceItem> {
    let item = |id: &str, name: &str, description: &str, cost: u64, taps: u32, mult: f64| MarketplaceItem {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        cost_auron: cost,
        duration_taps: taps,
        multiplier: mult,
    };
    vec![
        item("overclock", "Overclock", "x2 points for 50 taps", 5, 50, 2.0),
        item("plasma_core", "Plasma Core", "x3 points for 100 taps", 15, 100, 3.0),
        item("forge_surge", "Forge Surge", "x5 points for 25 taps", 25, 25, 5.0),
    ]
}

/// Finite-lifetime tap multiplier bought in the marketplace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveTapBonus {
    pub id: String,
    pub item_id: String,
    pub name: String,
    pub remaining_taps: u32,
    #[serde(alias = "bonusMultiplier")]
    pub multiplier: f64,
    #[serde(alias = "originalDurationTaps")]
    pub original_taps: u32,
}

// ---------------- Aggregate -----------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: Option<PlayerProfile>,
    /// Spendable balance; fractional because drone income is fractional.
    pub points: f64,
    #[serde(alias = "pointsPerSecond")]
    pub points_per_second: f64,
    #[serde(alias = "currentStreak")]
    pub current_streak: u32,
    #[serde(alias = "criticalHits")]
    pub critical_hits: u32,
    #[serde(alias = "comboBonus")]
    pub combo_bonus: f64,
    #[serde(alias = "dronesCount")]
    pub drones_count: u32,
    #[serde(alias = "isGameActive")]
    pub is_game_active: bool,
    #[serde(alias = "lastSave")]
    pub last_save: f64,
    #[serde(default, alias = "lastDailyQuestRefresh")]
    pub last_quest_refresh: f64,
    #[serde(alias = "dailyQuests")]
    pub daily_quests: Vec<DailyQuest>,
    pub achievements: Vec<Achievement>,
    #[serde(alias = "battlePass")]
    pub battle_pass: BattlePassProgress,
}

impl GameState {
    pub fn initial(battle_pass_xp_step: f64) -> Self {
        Self {
            player: None,
            points: 0.0,
            points_per_second: 0.0,
            current_streak: 0,
            critical_hits: 0,
            combo_bonus: 1.0,
            drones_count: 0,
            is_game_active: false,
            last_save: 0.0,
            last_quest_refresh: 0.0,
            daily_quests: issue_daily_quests(0.0),
            achievements: ACHIEVEMENTS.iter().map(Achievement::from).collect(),
            battle_pass: BattlePassProgress::new(battle_pass_xp_step),
        }
    }

    /// Name of the first numeric field that JSON cannot represent, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        let mut fields = vec![
            ("points", self.points),
            ("points_per_second", self.points_per_second),
            ("combo_bonus", self.combo_bonus),
            ("last_save", self.last_save),
            ("last_quest_refresh", self.last_quest_refresh),
            ("battle_pass.experience", self.battle_pass.experience),
            ("battle_pass.experience_to_next", self.battle_pass.experience_to_next),
        ];
        if let Some(p) = &self.player {
            fields.extend([
                ("player.experience", p.experience),
                ("player.experience_to_next", p.experience_to_next),
                ("player.total_points", p.total_points),
                ("player.taps_available_at", p.taps_available_at),
            ]);
            fields.extend(p.active_tap_bonuses.iter().map(|b| ("active_tap_bonuses.multiplier", b.multiplier)));
        }
        for q in &self.daily_quests {
            fields.extend([
                ("daily_quests.progress", q.progress),
                ("daily_quests.target", q.target),
                ("daily_quests.reward", q.reward.points),
            ]);
        }
        fields.extend(
            self.achievements
                .iter()
                .filter_map(|a| a.unlocked_at)
                .map(|t| ("achievements.unlocked_at", t)),
        );
        fields.into_iter().find(|(_, v)| !v.is_finite()).map(|(name, _)| name)
    }

    #[cfg(test)]
    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn claimable_quests(&self) -> usize {
        self.daily_quests.iter().filter(|q| q.is_claimable()).count()
    }
}
