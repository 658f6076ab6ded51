use sqlx::PgPool;
use std::sync::Arc;

use crate::ai::TitleSuggester;
use crate::config::Config;
use crate::repository::{
    AttendanceStore, EventStore, PgAttendanceStore, PgEventStore, PgUserStore, UserStore,
};

/// Shared handler state: configuration plus one store per aggregate.
#[derive(Clone)]
pub struct AppRegistry {
    config: Arc<Config>,
    user_store: Arc<dyn UserStore>,
    event_store: Arc<dyn EventStore>,
    attendance_store: Arc<dyn AttendanceStore>,
    title_suggester: Arc<TitleSuggester>,
}

impl AppRegistry {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let title_suggester = Arc::new(TitleSuggester::new(&config));
        Self {
            config: Arc::new(config),
            user_store: Arc::new(PgUserStore::new(pool.clone())),
            event_store: Arc::new(PgEventStore::new(pool.clone())),
            attendance_store: Arc::new(PgAttendanceStore::new(pool)),
            title_suggester,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn user_store(&self) -> &dyn UserStore {
        self.user_store.as_ref()
    }

    pub fn event_store(&self) -> &dyn EventStore {
        self.event_store.as_ref()
    }

    pub fn attendance_store(&self) -> &dyn AttendanceStore {
        self.attendance_store.as_ref()
    }

    pub fn title_suggester(&self) -> &TitleSuggester {
        &self.title_suggester
    }
}
