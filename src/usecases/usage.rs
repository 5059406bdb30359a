use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::{
        blocks::BlockRepository, links::LinkRepository, pages::PageRepository,
        socials::SocialRepository, subscriptions::SubscriptionRepository, teams::TeamRepository,
    },
    value_objects::{
        teams::TeamMembership,
        usage::{ResourceCounts, UsageSnapshot},
    },
};

/// How long a computed snapshot may be served without recounting. Within this
/// window a gate check can read counts that are one mutation behind, so a
/// concurrent create may land one row past the limit. That staleness is an
/// accepted tradeoff against counting five tables on every request.
pub const USAGE_SNAPSHOT_TTL: Duration = Duration::from_secs(5);

/// Snapshot cache seam. Writers that insert or delete a metered resource must
/// invalidate the owner's entry.
#[cfg_attr(test, mockall::automock)]
pub trait UsageCache: Send + Sync {
    fn get(&self, user_id: Uuid) -> Option<UsageSnapshot>;
    fn set(&self, user_id: Uuid, snapshot: UsageSnapshot);
    fn invalidate(&self, user_id: Uuid);
}

/// Process-local cache. In a horizontally scaled deployment every instance
/// holds its own map, widening the effective staleness window.
pub struct InMemoryUsageCache {
    ttl: Duration,
    entries: Mutex<HashMap<Uuid, (Instant, UsageSnapshot)>>,
}

impl InMemoryUsageCache {
    pub fn new() -> Self {
        Self::with_ttl(USAGE_SNAPSHOT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUsageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageCache for InMemoryUsageCache {
    fn get(&self, user_id: Uuid) -> Option<UsageSnapshot> {
        let mut entries = self.entries.lock().expect("usage cache lock poisoned");

        match entries.get(&user_id) {
            Some((stored_at, snapshot)) if stored_at.elapsed() < self.ttl => {
                Some(snapshot.clone())
            }
            Some(_) => {
                entries.remove(&user_id);
                None
            }
            None => None,
        }
    }

    fn set(&self, user_id: Uuid, snapshot: UsageSnapshot) {
        self.entries
            .lock()
            .expect("usage cache lock poisoned")
            .insert(user_id, (Instant::now(), snapshot));
    }

    fn invalidate(&self, user_id: Uuid) {
        self.entries
            .lock()
            .expect("usage cache lock poisoned")
            .remove(&user_id);
    }
}

/// What creating endpoints depend on: current limits plus cache invalidation
/// after a metered insert or delete.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UsageService: Send + Sync {
    async fn get_limits(&self, user_id: Uuid) -> Result<UsageSnapshot>;
    fn invalidate(&self, user_id: Uuid);
}

/// Computes a user's plan limits against their current resource counts,
/// falling back to free-tier defaults when no subscription is active.
pub struct UsageCounter<S, L, P, B, So, T, C>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    L: LinkRepository + Send + Sync + 'static,
    P: PageRepository + Send + Sync + 'static,
    B: BlockRepository + Send + Sync + 'static,
    So: SocialRepository + Send + Sync + 'static,
    T: TeamRepository + Send + Sync + 'static,
    C: UsageCache + 'static,
{
    subscription_repo: Arc<S>,
    link_repo: Arc<L>,
    page_repo: Arc<P>,
    block_repo: Arc<B>,
    social_repo: Arc<So>,
    team_repo: Arc<T>,
    cache: Arc<C>,
}

impl<S, L, P, B, So, T, C> UsageCounter<S, L, P, B, So, T, C>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    L: LinkRepository + Send + Sync + 'static,
    P: PageRepository + Send + Sync + 'static,
    B: BlockRepository + Send + Sync + 'static,
    So: SocialRepository + Send + Sync + 'static,
    T: TeamRepository + Send + Sync + 'static,
    C: UsageCache + 'static,
{
    pub fn new(
        subscription_repo: Arc<S>,
        link_repo: Arc<L>,
        page_repo: Arc<P>,
        block_repo: Arc<B>,
        social_repo: Arc<So>,
        team_repo: Arc<T>,
        cache: Arc<C>,
    ) -> Self {
        Self {
            subscription_repo,
            link_repo,
            page_repo,
            block_repo,
            social_repo,
            team_repo,
            cache,
        }
    }

    async fn compute_snapshot(&self, user_id: Uuid) -> Result<UsageSnapshot> {
        let counts = self.gather_counts(user_id).await?;

        let snapshot = match self.subscription_repo.find_active_with_plan(user_id).await? {
            Some((_, plan)) => {
                debug!(%user_id, plan_id = %plan.id, "usage: applying active plan limits");
                UsageSnapshot::from_plan(plan.name.clone(), &plan.limits, counts)
            }
            None => {
                debug!(%user_id, "usage: no active plan, applying free-tier defaults");
                UsageSnapshot::free_tier(counts)
            }
        };

        Ok(snapshot)
    }

    async fn gather_counts(&self, user_id: Uuid) -> Result<ResourceCounts> {
        let (links, pages, blocks, profile_socials, menu_socials) = tokio::try_join!(
            self.link_repo.count_by_user(user_id),
            self.page_repo.count_by_user(user_id),
            self.block_repo.count_by_user(user_id),
            self.social_repo.count_profile_by_user(user_id),
            self.social_repo.count_menu_by_user(user_id),
        )?;

        // Profile and menu socials draw from one shared quota.
        let socials = profile_socials + menu_socials;

        let team_members = match self.resolve_membership(user_id).await {
            TeamMembership::Member(team_id) => {
                match self.team_repo.count_members(team_id).await {
                    Ok(count) => count,
                    Err(err) => {
                        warn!(
                            %user_id,
                            %team_id,
                            db_error = ?err,
                            "usage: member count failed, counting zero"
                        );
                        0
                    }
                }
            }
            TeamMembership::NotOnTeam | TeamMembership::LookupFailed => 0,
        };

        Ok(ResourceCounts {
            links,
            pages,
            blocks,
            socials,
            team_members,
        })
    }

    /// Lookup failure resolves to zero like "no team" does, but stays a
    /// distinct variant so it can be logged as a fault rather than a state.
    async fn resolve_membership(&self, user_id: Uuid) -> TeamMembership {
        match self.team_repo.find_team_of_user(user_id).await {
            Ok(Some(team_id)) => TeamMembership::Member(team_id),
            Ok(None) => TeamMembership::NotOnTeam,
            Err(err) => {
                warn!(
                    %user_id,
                    db_error = ?err,
                    "usage: team lookup failed, treating as zero members"
                );
                TeamMembership::LookupFailed
            }
        }
    }
}

#[async_trait]
impl<S, L, P, B, So, T, C> UsageService for UsageCounter<S, L, P, B, So, T, C>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    L: LinkRepository + Send + Sync + 'static,
    P: PageRepository + Send + Sync + 'static,
    B: BlockRepository + Send + Sync + 'static,
    So: SocialRepository + Send + Sync + 'static,
    T: TeamRepository + Send + Sync + 'static,
    C: UsageCache + 'static,
{
    async fn get_limits(&self, user_id: Uuid) -> Result<UsageSnapshot> {
        if let Some(snapshot) = self.cache.get(user_id) {
            debug!(%user_id, "usage: serving cached snapshot");
            return Ok(snapshot);
        }

        let snapshot = self.compute_snapshot(user_id).await?;
        self.cache.set(user_id, snapshot.clone());

        Ok(snapshot)
    }

    fn invalidate(&self, user_id: Uuid) {
        self.cache.invalidate(user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{plans::PlanEntity, subscriptions::SubscriptionEntity},
        repositories::{
            blocks::MockBlockRepository, links::MockLinkRepository, pages::MockPageRepository,
            socials::MockSocialRepository, subscriptions::MockSubscriptionRepository,
            teams::MockTeamRepository,
        },
        value_objects::plans::PlanLimits,
    };
    use anyhow::anyhow;
    use chrono::{Duration as ChronoDuration, Utc};
    use mockall::predicate::eq;

    fn sample_plan(limits: PlanLimits) -> PlanEntity {
        PlanEntity {
            id: Uuid::new_v4(),
            name: Some("Pro".to_string()),
            price_minor: 990,
            duration_days: 30,
            limits,
            is_active: true,
        }
    }

    fn sample_subscription(user_id: Uuid, plan_id: Uuid) -> SubscriptionEntity {
        let now = Utc::now();
        SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id,
            plan_id,
            starts_at: now - ChronoDuration::days(1),
            ends_at: now + ChronoDuration::days(29),
            status: "active".to_string(),
            canceled_at: None,
            created_at: now,
        }
    }

    struct Mocks {
        subscriptions: MockSubscriptionRepository,
        links: MockLinkRepository,
        pages: MockPageRepository,
        blocks: MockBlockRepository,
        socials: MockSocialRepository,
        teams: MockTeamRepository,
        cache: MockUsageCache,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                subscriptions: MockSubscriptionRepository::new(),
                links: MockLinkRepository::new(),
                pages: MockPageRepository::new(),
                blocks: MockBlockRepository::new(),
                socials: MockSocialRepository::new(),
                teams: MockTeamRepository::new(),
                cache: MockUsageCache::new(),
            }
        }

        fn with_counts(mut self, links: i64, pages: i64, blocks: i64) -> Self {
            self.links
                .expect_count_by_user()
                .returning(move |_| Box::pin(async move { Ok(links) }));
            self.pages
                .expect_count_by_user()
                .returning(move |_| Box::pin(async move { Ok(pages) }));
            self.blocks
                .expect_count_by_user()
                .returning(move |_| Box::pin(async move { Ok(blocks) }));
            self
        }

        fn with_socials(mut self, profile: i64, menu: i64) -> Self {
            self.socials
                .expect_count_profile_by_user()
                .returning(move |_| Box::pin(async move { Ok(profile) }));
            self.socials
                .expect_count_menu_by_user()
                .returning(move |_| Box::pin(async move { Ok(menu) }));
            self
        }

        fn with_no_team(mut self) -> Self {
            self.teams
                .expect_find_team_of_user()
                .returning(|_| Box::pin(async { Ok(None) }));
            self
        }

        fn with_cache_miss(mut self) -> Self {
            self.cache.expect_get().returning(|_| None);
            self.cache.expect_set().returning(|_, _| ());
            self
        }

        fn build(
            self,
        ) -> UsageCounter<
            MockSubscriptionRepository,
            MockLinkRepository,
            MockPageRepository,
            MockBlockRepository,
            MockSocialRepository,
            MockTeamRepository,
            MockUsageCache,
        > {
            UsageCounter::new(
                Arc::new(self.subscriptions),
                Arc::new(self.links),
                Arc::new(self.pages),
                Arc::new(self.blocks),
                Arc::new(self.socials),
                Arc::new(self.teams),
                Arc::new(self.cache),
            )
        }
    }

    #[tokio::test]
    async fn returns_free_tier_defaults_without_active_subscription() {
        let user_id = Uuid::new_v4();

        let mut mocks = Mocks::new()
            .with_counts(2, 0, 1)
            .with_socials(0, 0)
            .with_no_team()
            .with_cache_miss();
        mocks
            .subscriptions
            .expect_find_active_with_plan()
            .with(eq(user_id))
            .returning(|_| Box::pin(async { Ok(None) }));

        let snapshot = mocks.build().get_limits(user_id).await.unwrap();

        assert!(!snapshot.has_active_plan);
        assert_eq!(snapshot.plan_name, None);
        assert_eq!(snapshot.links.max, 5);
        assert_eq!(snapshot.pages.max, 1);
        assert_eq!(snapshot.blocks.max, 10);
        assert_eq!(snapshot.socials.max, 3);
        assert_eq!(snapshot.team_members.max, 1);
        assert!(!snapshot.features.qr_code);
        assert!(!snapshot.features.analytics);
        assert!(!snapshot.features.custom_templates);
        assert!(!snapshot.features.menu_builder);
        assert_eq!(snapshot.links.current, 2);
    }

    #[tokio::test]
    async fn returns_plan_limits_verbatim_with_active_subscription() {
        let user_id = Uuid::new_v4();
        let plan = sample_plan(PlanLimits {
            max_links: Some(50),
            max_pages: Some(10),
            max_blocks: Some(100),
            max_socials: Some(20),
            max_team_members: Some(8),
            qr_code_enabled: Some(true),
            analytics_enabled: Some(true),
            custom_templates_enabled: Some(false),
            menu_builder_enabled: Some(true),
        });
        let subscription = sample_subscription(user_id, plan.id);

        let mut mocks = Mocks::new()
            .with_counts(10, 2, 30)
            .with_socials(3, 2)
            .with_no_team()
            .with_cache_miss();
        mocks
            .subscriptions
            .expect_find_active_with_plan()
            .with(eq(user_id))
            .returning(move |_| {
                let pair = (subscription.clone(), plan.clone());
                Box::pin(async move { Ok(Some(pair)) })
            });

        let snapshot = mocks.build().get_limits(user_id).await.unwrap();

        assert!(snapshot.has_active_plan);
        assert_eq!(snapshot.plan_name.as_deref(), Some("Pro"));
        assert_eq!(snapshot.links.max, 50);
        assert_eq!(snapshot.pages.max, 10);
        assert_eq!(snapshot.blocks.max, 100);
        assert_eq!(snapshot.socials.max, 20);
        assert_eq!(snapshot.team_members.max, 8);
        assert!(snapshot.features.qr_code);
        assert!(snapshot.features.analytics);
        assert!(!snapshot.features.custom_templates);
        assert!(snapshot.features.menu_builder);
    }

    #[tokio::test]
    async fn sums_profile_and_menu_socials_against_one_quota() {
        let user_id = Uuid::new_v4();

        let mut mocks = Mocks::new()
            .with_counts(0, 0, 0)
            .with_socials(2, 1)
            .with_no_team()
            .with_cache_miss();
        mocks
            .subscriptions
            .expect_find_active_with_plan()
            .returning(|_| Box::pin(async { Ok(None) }));

        let snapshot = mocks.build().get_limits(user_id).await.unwrap();

        assert_eq!(snapshot.socials.current, 3);
    }

    #[tokio::test]
    async fn counts_team_members_through_the_users_team() {
        let user_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();

        let mut mocks = Mocks::new()
            .with_counts(0, 0, 0)
            .with_socials(0, 0)
            .with_cache_miss();
        mocks
            .teams
            .expect_find_team_of_user()
            .with(eq(user_id))
            .returning(move |_| Box::pin(async move { Ok(Some(team_id)) }));
        mocks
            .teams
            .expect_count_members()
            .with(eq(team_id))
            .returning(|_| Box::pin(async { Ok(4) }));
        mocks
            .subscriptions
            .expect_find_active_with_plan()
            .returning(|_| Box::pin(async { Ok(None) }));

        let snapshot = mocks.build().get_limits(user_id).await.unwrap();

        assert_eq!(snapshot.team_members.current, 4);
    }

    #[tokio::test]
    async fn reports_zero_members_after_leaving_a_team() {
        let user_id = Uuid::new_v4();

        let mut mocks = Mocks::new()
            .with_counts(0, 0, 0)
            .with_socials(0, 0)
            .with_no_team()
            .with_cache_miss();
        mocks
            .subscriptions
            .expect_find_active_with_plan()
            .returning(|_| Box::pin(async { Ok(None) }));

        let snapshot = mocks.build().get_limits(user_id).await.unwrap();

        assert_eq!(snapshot.team_members.current, 0);
    }

    #[tokio::test]
    async fn team_lookup_failure_counts_as_zero_not_an_error() {
        let user_id = Uuid::new_v4();

        let mut mocks = Mocks::new()
            .with_counts(0, 0, 0)
            .with_socials(0, 0)
            .with_cache_miss();
        mocks
            .teams
            .expect_find_team_of_user()
            .returning(|_| Box::pin(async { Err(anyhow!("connection reset")) }));
        mocks
            .subscriptions
            .expect_find_active_with_plan()
            .returning(|_| Box::pin(async { Ok(None) }));

        let snapshot = mocks.build().get_limits(user_id).await.unwrap();

        assert_eq!(snapshot.team_members.current, 0);
    }

    #[tokio::test]
    async fn serves_cached_snapshot_without_touching_repositories() {
        let user_id = Uuid::new_v4();
        let cached = UsageSnapshot::free_tier(ResourceCounts {
            links: 3,
            ..ResourceCounts::default()
        });

        // No expectations on any repository: a call would panic the mock.
        let mut mocks = Mocks::new();
        let returned = cached.clone();
        mocks
            .cache
            .expect_get()
            .with(eq(user_id))
            .returning(move |_| Some(returned.clone()));

        let snapshot = mocks.build().get_limits(user_id).await.unwrap();

        assert_eq!(snapshot, cached);
    }

    #[test]
    fn in_memory_cache_round_trips_within_ttl() {
        let cache = InMemoryUsageCache::with_ttl(Duration::from_secs(60));
        let user_id = Uuid::new_v4();
        let snapshot = UsageSnapshot::free_tier(ResourceCounts::default());

        cache.set(user_id, snapshot.clone());

        assert_eq!(cache.get(user_id), Some(snapshot));
    }

    #[test]
    fn in_memory_cache_expires_entries_past_ttl() {
        let cache = InMemoryUsageCache::with_ttl(Duration::ZERO);
        let user_id = Uuid::new_v4();

        cache.set(user_id, UsageSnapshot::free_tier(ResourceCounts::default()));

        assert_eq!(cache.get(user_id), None);
    }

    #[test]
    fn in_memory_cache_invalidate_drops_the_entry() {
        let cache = InMemoryUsageCache::with_ttl(Duration::from_secs(60));
        let user_id = Uuid::new_v4();

        cache.set(user_id, UsageSnapshot::free_tier(ResourceCounts::default()));
        cache.invalidate(user_id);

        assert_eq!(cache.get(user_id), None);
    }
}
