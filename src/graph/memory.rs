// In-memory graph used by unit and router tests
//
// Statements are dispatched on their name. Ordering is read back from the
// ORDER BY clause so paging behaves like the real store.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

use crate::auth::service::{FIND_USER_BY_EMAIL, REGISTER_USER};
use crate::favorites::service::{DELETE_FAVORITE, FAVORITES_BY_USER, SAVE_FAVORITE};
use crate::graph::driver::{AccessMode, GraphDriver, GraphSession, Record, Statement, StoreError};
use crate::graph::schema::{USER_EMAIL_CONSTRAINT, USER_ID_CONSTRAINT};
use crate::ratings::service::{RATINGS_BY_MOVIE, SAVE_RATING};

const CLOCK_START: i64 = 1_700_000_000_000;

#[derive(Debug, Clone)]
struct UserNode {
    user_id: String,
    email: String,
    name: String,
    password: String,
    created_at: String,
}

#[derive(Debug, Clone)]
struct Favorite {
    user_id: String,
    movie_id: String,
    created_at: i64,
}

#[derive(Debug, Clone)]
struct Rating {
    user_id: String,
    movie_id: String,
    rating: i64,
    timestamp: i64,
}

#[derive(Default)]
struct State {
    users: Vec<UserNode>,
    movies: Vec<Record>,
    favorites: Vec<Favorite>,
    ratings: Vec<Rating>,
    clock: i64,
    constraints: Vec<&'static str>,
    sessions_opened: usize,
    sessions_closed: usize,
    session_modes: Vec<AccessMode>,
    transactions_run: usize,
    fail_next: Option<StoreError>,
    panic_next: bool,
    stall_next: bool,
    refuse_sessions: bool,
    executed: Vec<(&'static str, String)>,
}

impl State {
    fn tick(&mut self) -> i64 {
        self.clock += 1;
        CLOCK_START + self.clock
    }

    fn user(&self, user_id: &str) -> Option<&UserNode> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    fn movie(&self, movie_id: &str) -> Option<&Record> {
        self.movies
            .iter()
            .find(|m| m.get("tmdbId").and_then(Value::as_str) == Some(movie_id))
    }
}

/// Graph store double with inspectable session bookkeeping
#[derive(Clone, Default)]
pub struct MemoryGraph {
    state: Arc<Mutex<State>>,
    stalled: Arc<Notify>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_user(&self, user_id: &str, email: &str, name: &str) {
        self.state().users.push(UserNode {
            user_id: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            password: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        });
    }

    pub fn add_movie(&self, tmdb_id: &str, title: &str, year: i64) {
        let movie = json!({"tmdbId": tmdb_id, "title": title, "year": year});
        if let Value::Object(record) = movie {
            self.state().movies.push(record);
        }
    }

    /// Fail the next transaction with `error`
    pub fn fail_next(&self, error: StoreError) {
        self.state().fail_next = Some(error);
    }

    /// Panic inside the next transaction
    pub fn panic_next(&self) {
        self.state().panic_next = true;
    }

    /// Leave the next transaction pending until [`MemoryGraph::release_stalled`]
    pub fn stall_next(&self) {
        self.state().stall_next = true;
    }

    pub fn release_stalled(&self) {
        self.stalled.notify_waiters();
    }

    /// Cypher text of every statement run under `name`, oldest first
    pub fn executed(&self, name: &str) -> Vec<String> {
        self.state()
            .executed
            .iter()
            .filter(|(executed, _)| *executed == name)
            .map(|(_, cypher)| cypher.clone())
            .collect()
    }

    /// Make every `open_session` fail
    pub fn refuse_sessions(&self) {
        self.state().refuse_sessions = true;
    }

    pub fn sessions_opened(&self) -> usize {
        self.state().sessions_opened
    }

    pub fn sessions_closed(&self) -> usize {
        self.state().sessions_closed
    }

    pub fn session_modes(&self) -> Vec<AccessMode> {
        self.state().session_modes.clone()
    }

    pub fn transactions_run(&self) -> usize {
        self.state().transactions_run
    }

    pub fn constraints(&self) -> Vec<&'static str> {
        self.state().constraints.clone()
    }

    pub fn stored_password(&self, email: &str) -> Option<String> {
        let state = self.state();
        state.users.iter().find(|u| u.email == email).map(|u| u.password.clone())
    }

    pub fn user_created_at(&self, email: &str) -> Option<String> {
        let state = self.state();
        state.users.iter().find(|u| u.email == email).map(|u| u.created_at.clone())
    }

    pub fn users_with_email(&self, email: &str) -> usize {
        self.state().users.iter().filter(|u| u.email == email).count()
    }

    pub fn favorite_count(&self, user_id: &str, movie_id: &str) -> usize {
        self.state()
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id && f.movie_id == movie_id)
            .count()
    }

    pub fn favorite_created_at(&self, user_id: &str, movie_id: &str) -> Option<i64> {
        self.state()
            .favorites
            .iter()
            .find(|f| f.user_id == user_id && f.movie_id == movie_id)
            .map(|f| f.created_at)
    }

    pub fn rating_count(&self, user_id: &str, movie_id: &str) -> usize {
        self.state()
            .ratings
            .iter()
            .filter(|r| r.user_id == user_id && r.movie_id == movie_id)
            .count()
    }

    /// `(rating, timestamp)` of the pair's rating
    pub fn rating(&self, user_id: &str, movie_id: &str) -> Option<(i64, i64)> {
        self.state()
            .ratings
            .iter()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id)
            .map(|r| (r.rating, r.timestamp))
    }
}

#[async_trait]
impl GraphDriver for MemoryGraph {
    type Session = MemorySession;

    async fn open_session(&self, mode: AccessMode) -> Result<Self::Session, StoreError> {
        let mut state = self.state();
        if state.refuse_sessions {
            return Err(StoreError::Connection("connection refused".to_string()));
        }
        state.sessions_opened += 1;
        state.session_modes.push(mode);

        Ok(MemorySession {
            graph: self.clone(),
            mode,
        })
    }
}

pub struct MemorySession {
    graph: MemoryGraph,
    mode: AccessMode,
}

#[async_trait]
impl GraphSession for MemorySession {
    async fn run(&mut self, statement: &Statement) -> Result<Vec<Record>, StoreError> {
        let (should_panic, should_stall) = {
            let mut state = self.graph.state();
            state.transactions_run += 1;
            state
                .executed
                .push((statement.name(), statement.cypher().to_string()));
            (
                std::mem::take(&mut state.panic_next),
                std::mem::take(&mut state.stall_next),
            )
        };
        // Outside the lock so the mutex is not poisoned
        if should_panic {
            panic!("transaction function panicked");
        }
        if should_stall {
            self.graph.stalled.notified().await;
        }

        let mut state = self.graph.state();
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }

        if is_write(statement.name()) && self.mode == AccessMode::Read {
            return Err(StoreError::Query(format!(
                "write statement `{}` in a read session",
                statement.name()
            )));
        }

        dispatch(&mut state, statement)
    }

    fn close(&mut self) {
        self.graph.state().sessions_closed += 1;
    }
}

fn is_write(name: &str) -> bool {
    [
        REGISTER_USER,
        SAVE_FAVORITE,
        DELETE_FAVORITE,
        SAVE_RATING,
        USER_EMAIL_CONSTRAINT,
        USER_ID_CONSTRAINT,
    ]
    .contains(&name)
}

fn text<'a>(statement: &'a Statement, key: &str) -> Result<&'a str, StoreError> {
    statement
        .text(key)
        .ok_or_else(|| StoreError::Query(format!("missing parameter ${}", key)))
}

fn integer(statement: &Statement, key: &str) -> Result<i64, StoreError> {
    statement
        .integer(key)
        .ok_or_else(|| StoreError::Query(format!("missing parameter ${}", key)))
}

fn object(value: Value) -> Record {
    match value {
        Value::Object(record) => record,
        _ => Record::new(),
    }
}

fn dispatch(state: &mut State, statement: &Statement) -> Result<Vec<Record>, StoreError> {
    match statement.name() {
        "test.sample" => Ok(vec![object(json!({"value": 1}))]),

        USER_EMAIL_CONSTRAINT | USER_ID_CONSTRAINT => {
            if !state.constraints.contains(&statement.name()) {
                state.constraints.push(statement.name());
            }
            Ok(Vec::new())
        }

        REGISTER_USER => {
            let email = text(statement, "email")?;
            if state.users.iter().any(|u| u.email == email) {
                return Ok(Vec::new());
            }
            let user = UserNode {
                user_id: text(statement, "userId")?.to_string(),
                email: email.to_string(),
                name: text(statement, "name")?.to_string(),
                password: text(statement, "password")?.to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
            };
            let row = json!({"userId": user.user_id, "email": user.email, "name": user.name});
            state.users.push(user);
            Ok(vec![object(row)])
        }

        FIND_USER_BY_EMAIL => {
            let email = text(statement, "email")?;
            Ok(state
                .users
                .iter()
                .filter(|u| u.email == email)
                .map(|u| {
                    object(json!({
                        "userId": u.user_id,
                        "email": u.email,
                        "name": u.name,
                        "password": u.password,
                        "createdAt": u.created_at,
                    }))
                })
                .collect())
        }

        SAVE_FAVORITE => {
            let user_id = text(statement, "userId")?;
            let movie_id = text(statement, "movieId")?;
            let movie = match (state.user(user_id), state.movie(movie_id)) {
                (Some(_), Some(movie)) => movie.clone(),
                _ => return Ok(Vec::new()),
            };
            let exists = state
                .favorites
                .iter()
                .any(|f| f.user_id == user_id && f.movie_id == movie_id);
            if !exists {
                let created_at = state.tick();
                state.favorites.push(Favorite {
                    user_id: user_id.to_string(),
                    movie_id: movie_id.to_string(),
                    created_at,
                });
            }
            Ok(vec![with(movie, "favorite", json!(true))])
        }

        DELETE_FAVORITE => {
            let user_id = text(statement, "userId")?;
            let movie_id = text(statement, "movieId")?;
            let before = state.favorites.len();
            state
                .favorites
                .retain(|f| !(f.user_id == user_id && f.movie_id == movie_id));
            if state.favorites.len() == before {
                return Ok(Vec::new());
            }
            Ok(state
                .movie(movie_id)
                .cloned()
                .map(|movie| vec![with(movie, "favorite", json!(false))])
                .unwrap_or_default())
        }

        FAVORITES_BY_USER => {
            let user_id = text(statement, "userId")?;
            let rows = state
                .favorites
                .iter()
                .filter(|f| f.user_id == user_id)
                .filter_map(|f| state.movie(&f.movie_id).cloned())
                .map(|movie| with(movie, "favorite", json!(true)))
                .collect();
            page(rows, statement)
        }

        SAVE_RATING => {
            let user_id = text(statement, "userId")?;
            let movie_id = text(statement, "movieId")?;
            let rating = integer(statement, "rating")?;
            let movie = match (state.user(user_id), state.movie(movie_id)) {
                (Some(_), Some(movie)) => movie.clone(),
                _ => return Ok(Vec::new()),
            };
            let timestamp = state.tick();
            match state
                .ratings
                .iter_mut()
                .find(|r| r.user_id == user_id && r.movie_id == movie_id)
            {
                Some(existing) => {
                    existing.rating = rating;
                    existing.timestamp = timestamp;
                }
                None => state.ratings.push(Rating {
                    user_id: user_id.to_string(),
                    movie_id: movie_id.to_string(),
                    rating,
                    timestamp,
                }),
            }
            Ok(vec![with(movie, "rating", json!(rating))])
        }

        RATINGS_BY_MOVIE => {
            let movie_id = text(statement, "movieId")?;
            let rows = state
                .ratings
                .iter()
                .filter(|r| r.movie_id == movie_id)
                .filter_map(|r| {
                    state.user(&r.user_id).map(|u| {
                        object(json!({
                            "rating": r.rating,
                            "timestamp": r.timestamp,
                            "user": {"userId": u.user_id, "name": u.name},
                        }))
                    })
                })
                .collect();
            page(rows, statement)
        }

        other => Err(StoreError::Query(format!("unknown statement `{}`", other))),
    }
}

fn with(mut record: Record, key: &str, value: Value) -> Record {
    record.insert(key.to_string(), value);
    record
}

/// Apply ORDER BY, SKIP and LIMIT the way the statement asks for
fn page(mut rows: Vec<Record>, statement: &Statement) -> Result<Vec<Record>, StoreError> {
    if let Some((field, descending)) = order_by(statement.cypher()) {
        rows.sort_by(|a, b| {
            let ordering = compare(a.get(&field), b.get(&field));
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    let skip = usize::try_from(integer(statement, "skip")?).unwrap_or(0);
    let limit = usize::try_from(integer(statement, "limit")?).unwrap_or(0);
    Ok(rows.into_iter().skip(skip).take(limit).collect())
}

// Reads ``ORDER BY m.`field` DIR``
fn order_by(cypher: &str) -> Option<(String, bool)> {
    let clause = &cypher[cypher.find("ORDER BY")?..];
    let start = clause.find('`')? + 1;
    let end = start + clause[start..].find('`')?;
    let direction = clause[end + 1..].split_whitespace().next()?;
    Some((clause[start..end].to_string(), direction == "DESC"))
}

// Missing values sort after present ones
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
