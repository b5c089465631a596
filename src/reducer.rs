//! Actions and state transitions.
//!
//! Every transition runs on a clone of the current state. A rejected action
//! discards the clone, so the caller always gets either the full effect or
//! the unchanged state back.

use thiserror::Error;

use crate::config::GameConfig;
use crate::model::{
    self, AchievementGoal, ActiveTapBonus, BattlePassReward, GameState, League, MarketplaceItem,
    PlayerData, PlayerProfile, QuestKind, RewardTrack,
};
use crate::persistence;
use crate::random::RandomSource;

#[derive(Clone, Debug, PartialEq)]
pub enum GameAction {
    InitPlayer(PlayerData),
    Tap,
    AddPoints(f64),
    /// Only applies once `experience >= experience_to_next`. Taps already
    /// resolve levels on their own, so this mostly settles loaded snapshots.
    LevelUp,
    BuyDrone,
    ClaimQuestReward(String),
    UnlockAchievement(String),
    SaveGame,
    /// Raw JSON snapshot as read from storage.
    LoadGame(String),
    ResetGame,
    RefillTaps,
    PurchaseBonus(MarketplaceItem),
    SetComboBonus(f64),
    RefreshQuests,
    ClaimBattlePassReward { level: u32, track: RewardTrack },
    UnlockPremiumPass,
    SelectCommander(String),
    ConnectWallet(String),
    DisconnectWallet,
}

/// Why an action left the state untouched.
#[derive(Debug, Error, PartialEq)]
pub enum Rejection {
    #[error("no player loaded")]
    NoPlayer,
    #[error("invalid player data: {0}")]
    InvalidPlayer(&'static str),
    #[error("not enough experience to level up")]
    NotEnoughExperience,
    #[error("quest {0} not found")]
    QuestNotFound(String),
    #[error("quest {0} is not completed")]
    QuestIncomplete(String),
    #[error("reward {0} already claimed")]
    AlreadyClaimed(String),
    #[error("achievement {0} not found")]
    UnknownAchievement(String),
    #[error("achievement {0} already unlocked")]
    AlreadyUnlocked(String),
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
    #[error("out of taps until {0}")]
    OutOfTaps(f64),
    #[error("tap allowance already full")]
    TapsFull,
    #[error("need {need} auron, have {have}")]
    InsufficientAuron { need: u64, have: u64 },
    #[error("invalid marketplace item {0}")]
    InvalidItem(String),
    #[error("combo bonus must be finite and positive")]
    InvalidComboBonus,
    #[error("point amount must be finite")]
    InvalidAmount,
    #[error("point total would overflow")]
    PointsOverflow,
    #[error("daily quests have not expired yet")]
    QuestsNotExpired,
    #[error("battle pass tier {0} not reached")]
    TierLocked(u32),
    #[error("premium track is locked")]
    PremiumLocked,
    #[error("premium track already unlocked")]
    PremiumAlreadyUnlocked,
    #[error("unknown commander {0}")]
    UnknownCommander(String),
    #[error("commander {0} is locked")]
    CommanderLocked(String),
    #[error("wallet address is empty")]
    InvalidWallet,
}

/// What a transition may read besides the state itself.
pub struct Context<'a> {
    pub config: &'a GameConfig,
    pub rng: &'a mut dyn RandomSource,
    pub now_ms: f64,
}

/// Multiplier from a streak of consecutive criticals, capped at `streak_cap`.
pub fn streak_multiplier(streak: u32, config: &GameConfig) -> f64 {
    (1.0 + config.streak_step * streak as f64).min(config.streak_cap)
}

/// Points for one tap. `streak` is the streak after this tap is counted.
pub fn tap_points(critical: bool, streak: u32, combo_bonus: f64, bonus: f64, config: &GameConfig) -> f64 {
    let crit = if critical { config.critical_multiplier } else { 1.0 };
    config.base_tap_points * crit * streak_multiplier(streak, config) * combo_bonus * bonus
}

/// Total transition: rejected actions yield an unchanged copy.
pub fn reduce(state: &GameState, action: GameAction, cx: &mut Context<'_>) -> GameState {
    try_reduce(state, action, cx).unwrap_or_else(|_| state.clone())
}

pub fn try_reduce(
    state: &GameState,
    action: GameAction,
    cx: &mut Context<'_>,
) -> Result<GameState, Rejection> {
    let mut next = state.clone();
    apply(&mut next, action, cx)?;
    Ok(next)
}

fn apply(s: &mut GameState, action: GameAction, cx: &mut Context<'_>) -> Result<(), Rejection> {
    use GameAction::*;
    let now = cx.now_ms;
    let cfg = cx.config;
    match action {
        InitPlayer(data) => init_player(s, data, cx)?,
        Tap => tap(s, cx)?,
        AddPoints(amount) => {
            if !amount.is_finite() {
                return Err(Rejection::InvalidAmount);
            }
            credit_points(s, amount)?;
        }
        LevelUp => {
            let p = s.player.as_ref().ok_or(Rejection::NoPlayer)?;
            if p.experience < p.experience_to_next {
                return Err(Rejection::NotEnoughExperience);
            }
            resolve_levels(s);
        }
        BuyDrone => {
            s.drones_count = s.drones_count.saturating_add(1);
            s.points_per_second += cfg.drone_income;
            advance_quests(s, QuestKind::DronesBought, 1.0);
        }
        ClaimQuestReward(id) => claim_quest(s, &id)?,
        UnlockAchievement(id) => {
            let a = s
                .achievements
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| Rejection::UnknownAchievement(id.clone()))?;
            if a.unlocked {
                return Err(Rejection::AlreadyUnlocked(id));
            }
            a.unlocked = true;
            a.unlocked_at = Some(now);
        }
        SaveGame => {
            s.last_save = now;
            return Ok(());
        }
        LoadGame(raw) => {
            let loaded = persistence::decode_snapshot(&raw)
                .map_err(|e| Rejection::MalformedSnapshot(e.to_string()))?;
            *s = loaded;
            return Ok(());
        }
        ResetGame => {
            *s = GameState::initial(cfg.battle_pass_xp_step);
            s.last_save = now;
            return Ok(());
        }
        RefillTaps => {
            let p = s.player.as_mut().ok_or(Rejection::NoPlayer)?;
            if p.current_taps >= p.max_taps {
                return Err(Rejection::TapsFull);
            }
            spend_auron(p, cfg.tap_refill_cost_auron)?;
            p.current_taps = p.max_taps;
            p.taps_available_at = 0.0;
        }
        PurchaseBonus(item) => {
            if !(item.multiplier.is_finite() && item.multiplier > 0.0) || item.duration_taps == 0 {
                return Err(Rejection::InvalidItem(item.id));
            }
            let p = s.player.as_mut().ok_or(Rejection::NoPlayer)?;
            spend_auron(p, item.cost_auron)?;
            let id = format!("{}-{}-{}", item.id, now as u64, p.active_tap_bonuses.len());
            p.active_tap_bonuses.push(ActiveTapBonus {
                id,
                item_id: item.id,
                name: item.name,
                remaining_taps: item.duration_taps,
                multiplier: item.multiplier,
                original_taps: item.duration_taps,
            });
        }
        SetComboBonus(value) => {
            if !(value.is_finite() && value > 0.0) {
                return Err(Rejection::InvalidComboBonus);
            }
            s.combo_bonus = value;
        }
        RefreshQuests => {
            if now - s.last_quest_refresh < cfg.quest_refresh_ms {
                return Err(Rejection::QuestsNotExpired);
            }
            s.daily_quests = model::issue_daily_quests(now);
            s.last_quest_refresh = now;
            sync_level_quests(s);
        }
        ClaimBattlePassReward { level, track } => claim_battle_pass(s, level, track)?,
        UnlockPremiumPass => {
            if s.battle_pass.premium_track_unlocked {
                return Err(Rejection::PremiumAlreadyUnlocked);
            }
            let p = s.player.as_mut().ok_or(Rejection::NoPlayer)?;
            spend_auron(p, cfg.premium_pass_cost_auron)?;
            s.battle_pass.premium_track_unlocked = true;
        }
        SelectCommander(id) => {
            let p = s.player.as_mut().ok_or(Rejection::NoPlayer)?;
            if model::commander(&id).is_none() {
                return Err(Rejection::UnknownCommander(id));
            }
            if !p.unlocked_commanders.contains(&id) {
                return Err(Rejection::CommanderLocked(id));
            }
            p.commander_id = id;
        }
        ConnectWallet(address) => {
            let p = s.player.as_mut().ok_or(Rejection::NoPlayer)?;
            let address = address.trim();
            if address.is_empty() {
                return Err(Rejection::InvalidWallet);
            }
            p.is_wallet_connected = true;
            p.wallet_address = Some(address.to_string());
        }
        DisconnectWallet => {
            let p = s.player.as_mut().ok_or(Rejection::NoPlayer)?;
            p.is_wallet_connected = false;
            p.wallet_address = None;
        }
    }
    unlock_achievements(s, now);
    Ok(())
}

fn init_player(s: &mut GameState, data: PlayerData, cx: &Context<'_>) -> Result<(), Rejection> {
    if data.name.trim().is_empty() {
        return Err(Rejection::InvalidPlayer("empty name"));
    }
    if model::commander(&data.commander_id).is_none() {
        return Err(Rejection::InvalidPlayer("unknown commander"));
    }
    if !(data.points.is_finite() && data.total_points.is_finite() && data.experience.is_finite()) {
        return Err(Rejection::InvalidPlayer("non-finite progression"));
    }
    let points = data.points;
    *s = GameState::initial(cx.config.battle_pass_xp_step);
    s.player = Some(PlayerProfile::from_data(data, cx.config.max_taps));
    s.points = points;
    s.is_game_active = true;
    s.daily_quests = model::issue_daily_quests(cx.now_ms);
    s.last_quest_refresh = cx.now_ms;
    resolve_levels(s);
    Ok(())
}

fn tap(s: &mut GameState, cx: &mut Context<'_>) -> Result<(), Rejection> {
    let cfg = cx.config;
    let now = cx.now_ms;
    if let Some(p) = s.player.as_mut() {
        if p.current_taps == 0 {
            if !p.can_tap(now) {
                return Err(Rejection::OutOfTaps(p.taps_available_at));
            }
            p.current_taps = p.max_taps;
            p.taps_available_at = 0.0;
        }
    }

    let critical = cx.rng.next_unit() < cfg.critical_chance;
    let streak = if critical { s.current_streak.saturating_add(1) } else { 0 };
    let bonus = s.player.as_ref().map_or(1.0, PlayerProfile::bonus_multiplier);
    let earned = tap_points(critical, streak, s.combo_bonus, bonus, cfg);

    s.current_streak = streak;
    if critical {
        s.critical_hits = s.critical_hits.saturating_add(1);
    }
    credit_points(s, earned)?;

    if let Some(p) = s.player.as_mut() {
        p.current_taps = p.current_taps.saturating_sub(1);
        if p.current_taps == 0 {
            p.taps_available_at = now + cfg.tap_refill_ms;
        }
        p.total_taps += 1;
        if critical {
            p.total_crits += 1;
        }
        p.longest_streak = p.longest_streak.max(streak);
        p.experience += earned;
        for b in p.active_tap_bonuses.iter_mut() {
            b.remaining_taps = b.remaining_taps.saturating_sub(1);
        }
        p.active_tap_bonuses.retain(|b| b.remaining_taps > 0);
    }

    advance_quests(s, QuestKind::Taps, 1.0);
    if critical {
        advance_quests(s, QuestKind::Criticals, 1.0);
    }
    gain_battle_pass_xp(s, earned);
    resolve_levels(s);
    Ok(())
}

/// Adds to the balance and the lifetime total; positive gains also count
/// toward the points quest.
fn credit_points(s: &mut GameState, amount: f64) -> Result<(), Rejection> {
    grant_points(s, amount)?;
    if amount > 0.0 {
        advance_quests(s, QuestKind::PointsEarned, amount);
    }
    Ok(())
}

/// Balance and lifetime total must stay finite or the snapshot cannot be
/// written back.
fn grant_points(s: &mut GameState, amount: f64) -> Result<(), Rejection> {
    let points = s.points + amount;
    let total = s.player.as_ref().map_or(0.0, |p| p.total_points + amount);
    if !(points.is_finite() && total.is_finite()) {
        return Err(Rejection::PointsOverflow);
    }
    s.points = points;
    if let Some(p) = s.player.as_mut() {
        p.total_points = total;
        p.league = League::for_points(total);
    }
    Ok(())
}

fn spend_auron(p: &mut PlayerProfile, cost: u64) -> Result<(), Rejection> {
    if p.auron < cost {
        return Err(Rejection::InsufficientAuron { need: cost, have: p.auron });
    }
    p.auron -= cost;
    Ok(())
}

fn advance_quests(s: &mut GameState, kind: QuestKind, by: f64) {
    for q in s.daily_quests.iter_mut().filter(|q| q.kind == kind) {
        q.progress = (q.progress + by).min(q.target);
    }
}

fn sync_level_quests(s: &mut GameState) {
    let Some(level) = s.player.as_ref().map(|p| p.level) else { return };
    for q in s
        .daily_quests
        .iter_mut()
        .filter(|q| q.kind == QuestKind::ReachLevel)
    {
        q.progress = (level as f64).min(q.target);
    }
}

/// Levels up while experience covers the threshold, carrying the overflow.
fn resolve_levels(s: &mut GameState) {
    let Some(p) = s.player.as_mut() else { return };
    while p.experience.is_finite() && p.experience >= p.experience_to_next && p.level < u32::MAX {
        p.experience -= p.experience_to_next;
        p.level += 1;
        p.experience_to_next = model::experience_for_level(p.level);
    }
    p.rank_title = model::rank_for_level(p.level).to_string();
    for c in model::commanders_for_level(p.level) {
        if !p.unlocked_commanders.contains(c.id) {
            p.unlocked_commanders.insert(c.id.to_string());
        }
    }
    sync_level_quests(s);
}

/// Battle-pass tiers use a fixed step, so the gained levels are computed in
/// one division. The level saturates at `u32::MAX`.
fn gain_battle_pass_xp(s: &mut GameState, xp: f64) {
    let bp = &mut s.battle_pass;
    bp.experience += xp;
    let step = bp.experience_to_next;
    if !(step > 0.0 && step.is_finite() && bp.experience.is_finite()) || bp.experience < step {
        return;
    }
    let gained = (bp.experience / step).floor() as u32;
    bp.level = bp.level.saturating_add(gained);
    bp.experience %= step;
}

fn claim_quest(s: &mut GameState, id: &str) -> Result<(), Rejection> {
    let q = s
        .daily_quests
        .iter_mut()
        .find(|q| q.id == id)
        .ok_or_else(|| Rejection::QuestNotFound(id.to_string()))?;
    if !q.is_completed() {
        return Err(Rejection::QuestIncomplete(id.to_string()));
    }
    if q.is_claimed {
        return Err(Rejection::AlreadyClaimed(id.to_string()));
    }
    q.is_claimed = true;
    let reward = q.reward;
    grant_points(s, reward.points)?;
    if let Some(p) = s.player.as_mut() {
        p.auron = p.auron.saturating_add(reward.auron);
    }
    Ok(())
}

fn claim_battle_pass(s: &mut GameState, level: u32, track: RewardTrack) -> Result<(), Rejection> {
    if s.player.is_none() {
        return Err(Rejection::NoPlayer);
    }
    let bp = &s.battle_pass;
    if level == 0 || level > bp.level {
        return Err(Rejection::TierLocked(level));
    }
    if track == RewardTrack::Premium && !bp.premium_track_unlocked {
        return Err(Rejection::PremiumLocked);
    }
    let reward_id = track.reward_id(level);
    if bp.rewards_claimed.contains(&reward_id) {
        return Err(Rejection::AlreadyClaimed(reward_id));
    }
    for reward in model::battle_pass_rewards(level, track) {
        match reward {
            BattlePassReward::Points(n) => grant_points(s, n)?,
            BattlePassReward::Auron(n) => {
                if let Some(p) = s.player.as_mut() {
                    p.auron = p.auron.saturating_add(n);
                }
            }
            BattlePassReward::Title(t) => {
                if let Some(p) = s.player.as_mut() {
                    p.titles.insert(t);
                }
            }
        }
    }
    s.battle_pass.rewards_claimed.insert(reward_id);
    Ok(())
}

fn goal_met(goal: AchievementGoal, s: &GameState) -> bool {
    let player = s.player.as_ref();
    match goal {
        AchievementGoal::FirstTap => player.is_some_and(|p| p.total_taps >= 1),
        AchievementGoal::ReachLevel(l) => player.is_some_and(|p| p.level >= l),
        AchievementGoal::TotalPoints(n) => player.is_some_and(|p| p.total_points >= n),
        AchievementGoal::FirstDrone => s.drones_count >= 1,
        AchievementGoal::Criticals(n) => s.critical_hits >= n,
    }
}

fn unlock_achievements(s: &mut GameState, now: f64) {
    let met: Vec<bool> = s
        .achievements
        .iter()
        .map(|a| {
            !a.unlocked && model::achievement_def(&a.id).is_some_and(|d| goal_met(d.goal, s))
        })
        .collect();
    for (a, met) in s.achievements.iter_mut().zip(met) {
        if met {
            a.unlocked = true;
            a.unlocked_at = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::marketplace_catalog;
    use crate::random::ScriptedRolls;
    use proptest::prelude::*;

    const NOW: f64 = 1_700_000_000_000.0;

    fn run(state: &GameState, action: GameAction, rolls: &mut ScriptedRolls) -> GameState {
        let config = GameConfig::default();
        let mut cx = Context { config: &config, rng: rolls, now_ms: NOW };
        reduce(state, action, &mut cx)
    }

    fn run_at(state: &GameState, action: GameAction, now_ms: f64) -> Result<GameState, Rejection> {
        let config = GameConfig::default();
        let mut rolls = ScriptedRolls::always(false);
        let mut cx = Context { config: &config, rng: &mut rolls, now_ms };
        try_reduce(state, action, &mut cx)
    }

    fn fresh() -> GameState {
        GameState::initial(GameConfig::default().battle_pass_xp_step)
    }

    fn with_player() -> GameState {
        run_at(&fresh(), GameAction::InitPlayer(PlayerData::new("Ada", "valkyr")), NOW).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn critical_tap_from_zero_scores_two_point_two() {
        let s = run(&fresh(), GameAction::Tap, &mut ScriptedRolls::always(true));
        assert!(approx(s.points, 2.2));
        assert_eq!(s.critical_hits, 1);
        assert_eq!(s.current_streak, 1);
    }

    #[test]
    fn plain_tap_scores_base() {
        let s = run(&fresh(), GameAction::Tap, &mut ScriptedRolls::always(false));
        assert!(approx(s.points, 1.0));
        assert_eq!(s.current_streak, 0);
        assert_eq!(s.critical_hits, 0);
    }

    #[test]
    fn streak_multiplier_caps_at_three() {
        let cfg = GameConfig::default();
        assert!(approx(streak_multiplier(0, &cfg), 1.0));
        assert!(approx(streak_multiplier(5, &cfg), 1.5));
        assert!(approx(streak_multiplier(20, &cfg), 3.0));
        assert!(approx(streak_multiplier(50, &cfg), 3.0));
    }

    #[test]
    fn combo_bonus_multiplies_tap() {
        let mut s = fresh();
        s = run(&s, GameAction::SetComboBonus(1.5), &mut ScriptedRolls::always(false));
        s = run(&s, GameAction::Tap, &mut ScriptedRolls::always(false));
        assert!(approx(s.points, 1.5));
    }

    #[test]
    fn rejects_bad_combo_bonus() {
        assert_eq!(
            run_at(&fresh(), GameAction::SetComboBonus(0.0), NOW),
            Err(Rejection::InvalidComboBonus)
        );
        assert!(run_at(&fresh(), GameAction::SetComboBonus(f64::NAN), NOW).is_err());
    }

    #[test]
    fn three_drones_give_one_and_a_half_per_second() {
        let mut s = fresh();
        for _ in 0..3 {
            s = run_at(&s, GameAction::BuyDrone, NOW).unwrap();
        }
        assert_eq!(s.drones_count, 3);
        assert!(approx(s.points_per_second, 1.5));
        let income = s.drones_count as f64 * GameConfig::default().drone_income;
        s = run_at(&s, GameAction::AddPoints(income), NOW).unwrap();
        assert!(approx(s.points, 1.5));
        assert!(s.achievement("first_drone").unwrap().unlocked);
    }

    #[test]
    fn add_points_tracks_lifetime_total() {
        let s = run_at(&with_player(), GameAction::AddPoints(0.5), NOW).unwrap();
        let s = run_at(&s, GameAction::AddPoints(0.25), NOW).unwrap();
        assert!(approx(s.points, 0.75));
        assert!(approx(s.player.as_ref().unwrap().total_points, 0.75));
        assert!(run_at(&s, GameAction::AddPoints(f64::INFINITY), NOW).is_err());
    }

    #[test]
    fn level_up_carries_overflow() {
        let mut s = with_player();
        {
            let p = s.player.as_mut().unwrap();
            p.level = 1;
            p.experience = 150.0;
            p.experience_to_next = 100.0;
        }
        let s = run_at(&s, GameAction::LevelUp, NOW).unwrap();
        let p = s.player.as_ref().unwrap();
        assert_eq!(p.level, 2);
        assert!(approx(p.experience, 50.0));
        assert!(approx(p.experience_to_next, 150.0));
        assert!(p.experience < p.experience_to_next);
    }

    #[test]
    fn level_up_without_player_is_noop() {
        let s = fresh();
        assert_eq!(run_at(&s, GameAction::LevelUp, NOW), Err(Rejection::NoPlayer));
        assert_eq!(run(&s, GameAction::LevelUp, &mut ScriptedRolls::always(false)), s);
    }

    #[test]
    fn level_up_needs_experience() {
        assert_eq!(
            run_at(&with_player(), GameAction::LevelUp, NOW),
            Err(Rejection::NotEnoughExperience)
        );
    }

    #[test]
    fn large_experience_resolves_several_levels_and_unlocks() {
        let mut s = with_player();
        s.player.as_mut().unwrap().experience = 10_000.0;
        let s = run_at(&s, GameAction::LevelUp, NOW).unwrap();
        let p = s.player.as_ref().unwrap();
        assert!(p.level > 5);
        assert!(p.experience < p.experience_to_next);
        assert_eq!(p.rank_title, model::rank_for_level(p.level));
        assert!(s.achievement("level_5").unwrap().unlocked);
        let q = s.daily_quests.iter().find(|q| q.kind == QuestKind::ReachLevel).unwrap();
        assert!(q.is_completed());
    }

    #[test]
    fn taps_feed_quests_and_experience() {
        let mut s = with_player();
        let mut rolls = ScriptedRolls::new(vec![true, false, true]);
        for _ in 0..3 {
            s = run(&s, GameAction::Tap, &mut rolls);
        }
        let taps = s.daily_quests.iter().find(|q| q.kind == QuestKind::Taps).unwrap();
        let crits = s.daily_quests.iter().find(|q| q.kind == QuestKind::Criticals).unwrap();
        let points = s.daily_quests.iter().find(|q| q.kind == QuestKind::PointsEarned).unwrap();
        assert_eq!(taps.progress, 3.0);
        assert_eq!(crits.progress, 2.0);
        assert!(approx(points.progress, s.points));
        let p = s.player.as_ref().unwrap();
        assert_eq!(p.total_taps, 3);
        assert_eq!(p.total_crits, 2);
        assert_eq!(p.longest_streak, 1);
        assert_eq!(p.current_taps, GameConfig::default().max_taps - 3);
        assert!(approx(p.experience, s.points));
        assert!(s.achievement("first_tap").unwrap().unlocked);
    }

    #[test]
    fn claim_quest_once() {
        let mut s = with_player();
        let id = s.daily_quests[0].id.clone();
        assert_eq!(
            run_at(&s, GameAction::ClaimQuestReward(id.clone()), NOW),
            Err(Rejection::QuestIncomplete(id.clone()))
        );
        s.daily_quests[0].progress = s.daily_quests[0].target;
        let once = run_at(&s, GameAction::ClaimQuestReward(id.clone()), NOW).unwrap();
        assert!(once.daily_quests[0].is_claimed);
        assert!(approx(once.points, 500.0));
        let twice = run(&once, GameAction::ClaimQuestReward(id), &mut ScriptedRolls::always(false));
        assert_eq!(once, twice);
    }

    #[test]
    fn claim_unknown_quest_rejected() {
        assert_eq!(
            run_at(&fresh(), GameAction::ClaimQuestReward("nope".into()), NOW),
            Err(Rejection::QuestNotFound("nope".into()))
        );
    }

    #[test]
    fn quest_auron_reward_goes_to_player() {
        let mut s = with_player();
        let idx = s.daily_quests.iter().position(|q| q.kind == QuestKind::Criticals).unwrap();
        s.daily_quests[idx].progress = 25.0;
        let id = s.daily_quests[idx].id.clone();
        let s = run_at(&s, GameAction::ClaimQuestReward(id), NOW).unwrap();
        assert_eq!(s.player.as_ref().unwrap().auron, 5);
    }

    #[test]
    fn achievement_unlocks_once() {
        let s = run_at(&fresh(), GameAction::UnlockAchievement("critical_master".into()), 5.0).unwrap();
        let a = s.achievement("critical_master").unwrap();
        assert!(a.unlocked);
        assert_eq!(a.unlocked_at, Some(5.0));
        assert_eq!(
            run_at(&s, GameAction::UnlockAchievement("critical_master".into()), 9.0),
            Err(Rejection::AlreadyUnlocked("critical_master".into()))
        );
        assert!(run_at(&s, GameAction::UnlockAchievement("ghost".into()), 9.0).is_err());
    }

    #[test]
    fn save_stamps_timestamp_only() {
        let s = with_player();
        let saved = run_at(&s, GameAction::SaveGame, NOW + 10.0).unwrap();
        assert_eq!(saved.last_save, NOW + 10.0);
        let mut back = saved.clone();
        back.last_save = s.last_save;
        assert_eq!(back, s);
    }

    #[test]
    fn malformed_load_leaves_state() {
        let s = with_player();
        let r = run_at(&s, GameAction::LoadGame("{\"points\": oops".into()), NOW);
        assert!(matches!(r, Err(Rejection::MalformedSnapshot(_))));
        assert_eq!(run(&s, GameAction::LoadGame("[]".into()), &mut ScriptedRolls::always(false)), s);
    }

    #[test]
    fn reset_restores_initial_and_stamps() {
        let mut s = with_player();
        s = run_at(&s, GameAction::BuyDrone, NOW).unwrap();
        let r = run_at(&s, GameAction::ResetGame, NOW + 1.0).unwrap();
        let mut expected = fresh();
        expected.last_save = NOW + 1.0;
        assert_eq!(r, expected);
    }

    #[test]
    fn init_player_validates_and_activates() {
        assert_eq!(
            run_at(&fresh(), GameAction::InitPlayer(PlayerData::new("  ", "valkyr")), NOW),
            Err(Rejection::InvalidPlayer("empty name"))
        );
        assert!(run_at(&fresh(), GameAction::InitPlayer(PlayerData::new("Ada", "ghost")), NOW).is_err());
        let s = with_player();
        assert!(s.is_game_active);
        assert_eq!(s.last_quest_refresh, NOW);
        assert!(s.daily_quests[0].id.ends_with(&format!("{}", NOW as u64)));
    }

    #[test]
    fn reinit_overwrites_progress() {
        let s = run_at(&with_player(), GameAction::BuyDrone, NOW).unwrap();
        let s = run_at(&s, GameAction::InitPlayer(PlayerData::new("Bo", "valkyr")), NOW).unwrap();
        assert_eq!(s.drones_count, 0);
        assert_eq!(s.player.as_ref().unwrap().name, "Bo");
    }

    #[test]
    fn tap_allowance_exhausts_and_refills() {
        let mut s = with_player();
        s.player.as_mut().unwrap().current_taps = 1;
        let mut rolls = ScriptedRolls::always(false);
        let config = GameConfig::default();
        let mut cx = Context { config: &config, rng: &mut rolls, now_ms: NOW };
        s = try_reduce(&s, GameAction::Tap, &mut cx).unwrap();
        let p = s.player.as_ref().unwrap();
        assert_eq!(p.current_taps, 0);
        assert_eq!(p.taps_available_at, NOW + config.tap_refill_ms);

        assert_eq!(
            try_reduce(&s, GameAction::Tap, &mut cx),
            Err(Rejection::OutOfTaps(NOW + config.tap_refill_ms))
        );

        cx.now_ms = NOW + config.tap_refill_ms;
        let s = try_reduce(&s, GameAction::Tap, &mut cx).unwrap();
        assert_eq!(s.player.as_ref().unwrap().current_taps, config.max_taps - 1);
    }

    #[test]
    fn refill_taps_costs_auron() {
        let mut s = with_player();
        assert_eq!(run_at(&s, GameAction::RefillTaps, NOW), Err(Rejection::TapsFull));
        {
            let p = s.player.as_mut().unwrap();
            p.current_taps = 0;
            p.taps_available_at = NOW + 1000.0;
        }
        assert_eq!(
            run_at(&s, GameAction::RefillTaps, NOW),
            Err(Rejection::InsufficientAuron { need: 10, have: 0 })
        );
        s.player.as_mut().unwrap().auron = 12;
        let s = run_at(&s, GameAction::RefillTaps, NOW).unwrap();
        let p = s.player.as_ref().unwrap();
        assert_eq!(p.auron, 2);
        assert_eq!(p.current_taps, p.max_taps);
    }

    #[test]
    fn bonus_applies_and_expires() {
        let mut s = with_player();
        s.player.as_mut().unwrap().auron = 100;
        let mut item = marketplace_catalog()[0].clone();
        item.duration_taps = 2;
        s = run_at(&s, GameAction::PurchaseBonus(item), NOW).unwrap();
        assert_eq!(s.player.as_ref().unwrap().auron, 95);
        assert_eq!(s.player.as_ref().unwrap().active_tap_bonuses.len(), 1);

        let mut rolls = ScriptedRolls::always(false);
        s = run(&s, GameAction::Tap, &mut rolls);
        assert!(approx(s.points, 2.0));
        assert_eq!(s.player.as_ref().unwrap().active_tap_bonuses[0].remaining_taps, 1);
        s = run(&s, GameAction::Tap, &mut rolls);
        assert!(s.player.as_ref().unwrap().active_tap_bonuses.is_empty());
        s = run(&s, GameAction::Tap, &mut rolls);
        assert!(approx(s.points, 5.0));
    }

    #[test]
    fn bonus_purchase_needs_player_and_auron() {
        let item = marketplace_catalog()[1].clone();
        assert_eq!(
            run_at(&fresh(), GameAction::PurchaseBonus(item.clone()), NOW),
            Err(Rejection::NoPlayer)
        );
        assert!(matches!(
            run_at(&with_player(), GameAction::PurchaseBonus(item), NOW),
            Err(Rejection::InsufficientAuron { .. })
        ));
    }

    #[test]
    fn quests_refresh_after_a_day() {
        let mut s = with_player();
        s.daily_quests[0].progress = 100.0;
        s.daily_quests[0].is_claimed = true;
        assert_eq!(
            run_at(&s, GameAction::RefreshQuests, NOW + 1000.0),
            Err(Rejection::QuestsNotExpired)
        );
        let later = NOW + GameConfig::default().quest_refresh_ms;
        let s = run_at(&s, GameAction::RefreshQuests, later).unwrap();
        assert!(!s.daily_quests[0].is_claimed);
        assert_eq!(s.daily_quests[0].progress, 0.0);
        assert_eq!(s.last_quest_refresh, later);
        let lvl = s.daily_quests.iter().find(|q| q.kind == QuestKind::ReachLevel).unwrap();
        assert_eq!(lvl.progress, 1.0);
    }

    #[test]
    fn battle_pass_levels_from_taps() {
        let mut s = with_player();
        s.battle_pass.experience = 999.5;
        let s = run(&s, GameAction::Tap, &mut ScriptedRolls::always(false));
        assert_eq!(s.battle_pass.level, 2);
        assert!(approx(s.battle_pass.experience, 0.5));
    }

    #[test]
    fn battle_pass_levels_in_one_step() {
        let s = run_at(&with_player(), GameAction::SetComboBonus(1e9), NOW).unwrap();
        let s = run(&s, GameAction::Tap, &mut ScriptedRolls::always(false));
        assert_eq!(s.battle_pass.level, 1_000_001);
        assert!(approx(s.battle_pass.experience, 0.0));
    }

    #[test]
    fn huge_tap_saturates_battle_pass_level() {
        let s = run_at(&with_player(), GameAction::SetComboBonus(1e20), NOW).unwrap();
        let s = run(&s, GameAction::Tap, &mut ScriptedRolls::always(false));
        assert_eq!(s.points, 1e20);
        assert_eq!(s.battle_pass.level, u32::MAX);
        assert!(s.battle_pass.experience < s.battle_pass.experience_to_next);
        let p = s.player.as_ref().unwrap();
        assert!(p.experience < p.experience_to_next);

        let again = run(&s, GameAction::Tap, &mut ScriptedRolls::always(false));
        assert_eq!(again.battle_pass.level, u32::MAX);
    }

    #[test]
    fn loaded_battle_pass_backlog_resolves_on_next_tap() {
        let mut s = with_player();
        s.battle_pass.experience = 1e300;
        let s = run(&s, GameAction::Tap, &mut ScriptedRolls::always(false));
        assert_eq!(s.battle_pass.level, u32::MAX);
        assert!(s.battle_pass.experience.is_finite());
    }

    #[test]
    fn point_total_never_overflows() {
        let s = run_at(&with_player(), GameAction::AddPoints(f64::MAX), NOW).unwrap();
        assert_eq!(
            run_at(&s, GameAction::AddPoints(f64::MAX), NOW),
            Err(Rejection::PointsOverflow)
        );
        let kept = run(&s, GameAction::AddPoints(f64::MAX), &mut ScriptedRolls::always(false));
        assert_eq!(kept.points, f64::MAX);
        assert_eq!(kept.player.as_ref().unwrap().total_points, f64::MAX);

        let big_combo = run_at(&with_player(), GameAction::SetComboBonus(f64::MAX), NOW).unwrap();
        assert_eq!(
            run_at(&big_combo, GameAction::Tap, NOW).and_then(|s| {
                let mut crit = ScriptedRolls::always(true);
                let config = GameConfig::default();
                let mut cx = Context { config: &config, rng: &mut crit, now_ms: NOW };
                try_reduce(&s, GameAction::Tap, &mut cx)
            }),
            Err(Rejection::PointsOverflow)
        );
    }

    #[test]
    fn battle_pass_claims() {
        let mut s = with_player();
        s.battle_pass.level = 10;
        assert_eq!(
            run_at(&s, GameAction::ClaimBattlePassReward { level: 11, track: RewardTrack::Free }, NOW),
            Err(Rejection::TierLocked(11))
        );
        assert_eq!(
            run_at(&s, GameAction::ClaimBattlePassReward { level: 10, track: RewardTrack::Premium }, NOW),
            Err(Rejection::PremiumLocked)
        );
        let s = run_at(&s, GameAction::ClaimBattlePassReward { level: 3, track: RewardTrack::Free }, NOW)
            .unwrap();
        assert!(approx(s.points, 300.0));
        assert!(s.battle_pass.rewards_claimed.contains("3:free"));
        assert_eq!(
            run_at(&s, GameAction::ClaimBattlePassReward { level: 3, track: RewardTrack::Free }, NOW),
            Err(Rejection::AlreadyClaimed("3:free".into()))
        );

        let mut s = s;
        s.player.as_mut().unwrap().auron = 150;
        let s = run_at(&s, GameAction::UnlockPremiumPass, NOW).unwrap();
        assert!(s.battle_pass.premium_track_unlocked);
        assert_eq!(run_at(&s, GameAction::UnlockPremiumPass, NOW), Err(Rejection::PremiumAlreadyUnlocked));
        let s = run_at(&s, GameAction::ClaimBattlePassReward { level: 10, track: RewardTrack::Premium }, NOW)
            .unwrap();
        let p = s.player.as_ref().unwrap();
        assert_eq!(p.auron, 100);
        assert!(p.titles.contains("Vanguard 1"));
    }

    #[test]
    fn commander_selection_respects_level() {
        let s = with_player();
        assert_eq!(
            run_at(&s, GameAction::SelectCommander("zenith".into()), NOW),
            Err(Rejection::CommanderLocked("zenith".into()))
        );
        assert!(run_at(&s, GameAction::SelectCommander("ghost".into()), NOW).is_err());
        let mut s = s;
        s.player.as_mut().unwrap().experience = 10_000.0;
        let s = run_at(&s, GameAction::LevelUp, NOW).unwrap();
        assert_eq!(s.player.as_ref().unwrap().level, 10);
        let s = run_at(&s, GameAction::SelectCommander("zenith".into()), NOW).unwrap();
        assert_eq!(s.player.as_ref().unwrap().commander_id, "zenith");
    }

    #[test]
    fn wallet_flags() {
        let s = run_at(&with_player(), GameAction::ConnectWallet(" 0xabc ".into()), NOW).unwrap();
        let p = s.player.as_ref().unwrap();
        assert!(p.is_wallet_connected);
        assert_eq!(p.wallet_address.as_deref(), Some("0xabc"));
        assert_eq!(run_at(&s, GameAction::ConnectWallet("".into()), NOW), Err(Rejection::InvalidWallet));
        let s = run_at(&s, GameAction::DisconnectWallet, NOW).unwrap();
        assert!(!s.player.as_ref().unwrap().is_wallet_connected);
    }

    #[test]
    fn league_follows_lifetime_points() {
        let s = run_at(&with_player(), GameAction::AddPoints(60_000.0), NOW).unwrap();
        assert_eq!(s.player.as_ref().unwrap().league, League::Gold);
    }

    proptest! {
        #[test]
        fn streak_tracks_consecutive_criticals(crits in proptest::collection::vec(any::<bool>(), 1..60)) {
            let mut s = fresh();
            let mut rolls = ScriptedRolls::new(crits.clone());
            let mut run_len = 0u32;
            for crit in crits {
                let before = s.points;
                s = run(&s, GameAction::Tap, &mut rolls);
                run_len = if crit { run_len + 1 } else { 0 };
                prop_assert_eq!(s.current_streak, run_len);
                prop_assert!(s.points >= before);
                prop_assert!(streak_multiplier(s.current_streak, &GameConfig::default()) <= 3.0);
            }
        }

        #[test]
        fn claim_is_idempotent(extra in 0u32..5) {
            let mut s = with_player();
            s.daily_quests[0].progress = s.daily_quests[0].target;
            let id = s.daily_quests[0].id.clone();
            let mut rolls = ScriptedRolls::always(false);
            let once = run(&s, GameAction::ClaimQuestReward(id.clone()), &mut rolls);
            let mut again = once.clone();
            for _ in 0..extra {
                again = run(&again, GameAction::ClaimQuestReward(id.clone()), &mut rolls);
            }
            prop_assert_eq!(once, again);
        }
    }
}
