//! In-memory store implementing every repository port.
//!
//! All collections sit behind one [`Mutex`], so each port call (including
//! closure-based updates and cascading deletes) is atomic with respect to
//! every other call. The lock is never held across an `.await`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    DepartmentMessagePersistenceError, DepartmentMessageRepository, DepartmentPersistenceError,
    DepartmentRepository, PendingVerificationPersistenceError, PendingVerificationRepository,
    RemovedUser, RosterSnapshot, SupportThreadPersistenceError, SupportThreadRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Department, DepartmentId, DepartmentMessage, Error, PendingVerification, Redemption, Role,
    SupportThread, User, UserId,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    departments: Vec<Department>,
    department_messages: Vec<DepartmentMessage>,
    support_threads: BTreeMap<UserId, SupportThread>,
    pending: HashMap<UserId, PendingVerification>,
}

impl State {
    fn roster(&self) -> RosterSnapshot {
        RosterSnapshot {
            admin_count: self
                .users
                .values()
                .filter(|user| user.role() == Role::Admin)
                .count(),
        }
    }
}

/// Process-wide data set shared by all repository ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state.lock().map_err(|_| POISONED.to_owned())
    }

    /// Number of stored department messages, across all departments.
    pub fn department_message_count(&self) -> usize {
        self.lock()
            .map(|state| state.department_messages.len())
            .unwrap_or_default()
    }

    /// Number of stored support threads.
    pub fn support_thread_count(&self) -> usize {
        self.lock()
            .map(|state| state.support_threads.len())
            .unwrap_or_default()
    }

    /// Whether a signup is pending for `email`.
    pub fn has_pending(&self, email: &UserId) -> bool {
        self.lock()
            .map(|state| state.pending.contains_key(email))
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state.users.contains_key(user.id()) {
            return Err(UserPersistenceError::duplicate(user.id().as_ref()));
        }
        state.users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.values().cloned().collect())
    }

    async fn update<T, F>(
        &self,
        id: &UserId,
        apply: F,
    ) -> Result<Option<Result<T, Error>>, UserPersistenceError>
    where
        T: Send,
        F: FnOnce(&mut User, RosterSnapshot) -> Result<T, Error> + Send,
    {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        let roster = state.roster();
        let Some(stored) = state.users.get_mut(id) else {
            return Ok(None);
        };
        let mut draft = stored.clone();
        let result = apply(&mut draft, roster);
        if result.is_ok() {
            *stored = draft;
        }
        Ok(Some(result))
    }

    async fn remove(&self, id: &UserId) -> Result<Option<RemovedUser>, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        let Some(user) = state.users.remove(id) else {
            return Ok(None);
        };
        let before = state.department_messages.len();
        state
            .department_messages
            .retain(|message| message.sender_id() != id);
        let department_messages = before.saturating_sub(state.department_messages.len());
        let support_thread = state.support_threads.remove(id).is_some();
        state.pending.remove(id);
        Ok(Some(RemovedUser {
            user,
            department_messages,
            support_thread,
        }))
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryStore {
    async fn insert(&self, department: &Department) -> Result<(), DepartmentPersistenceError> {
        let mut state = self.lock().map_err(DepartmentPersistenceError::query)?;
        if state
            .departments
            .iter()
            .any(|existing| existing.id() == department.id())
        {
            return Err(DepartmentPersistenceError::duplicate_id(
                department.id().as_ref(),
            ));
        }
        if state
            .departments
            .iter()
            .any(|existing| existing.name().matches(department.name()))
        {
            return Err(DepartmentPersistenceError::duplicate_name(
                department.name().as_ref(),
            ));
        }
        state.departments.push(department.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &DepartmentId,
    ) -> Result<Option<Department>, DepartmentPersistenceError> {
        let state = self.lock().map_err(DepartmentPersistenceError::query)?;
        Ok(state
            .departments
            .iter()
            .find(|department| department.id() == id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Department>, DepartmentPersistenceError> {
        let state = self.lock().map_err(DepartmentPersistenceError::query)?;
        Ok(state.departments.clone())
    }
}

#[async_trait]
impl DepartmentMessageRepository for InMemoryStore {
    async fn append(
        &self,
        message: &DepartmentMessage,
    ) -> Result<(), DepartmentMessagePersistenceError> {
        let mut state = self.lock().map_err(DepartmentMessagePersistenceError::query)?;
        state.department_messages.push(message.clone());
        Ok(())
    }

    async fn list_for_department(
        &self,
        department_id: &DepartmentId,
    ) -> Result<Vec<DepartmentMessage>, DepartmentMessagePersistenceError> {
        let state = self.lock().map_err(DepartmentMessagePersistenceError::query)?;
        let mut messages: Vec<DepartmentMessage> = state
            .department_messages
            .iter()
            .filter(|message| message.department_id() == department_id)
            .cloned()
            .collect();
        messages.sort_by_key(DepartmentMessage::timestamp);
        Ok(messages)
    }
}

#[async_trait]
impl SupportThreadRepository for InMemoryStore {
    async fn upsert_with<T, F>(
        &self,
        user_id: &UserId,
        apply: F,
    ) -> Result<T, SupportThreadPersistenceError>
    where
        T: Send,
        F: FnOnce(&mut SupportThread) -> T + Send,
    {
        let mut state = self.lock().map_err(SupportThreadPersistenceError::query)?;
        let thread = state
            .support_threads
            .entry(user_id.clone())
            .or_insert_with(|| SupportThread::new(user_id.clone()));
        Ok(apply(thread))
    }

    async fn update_existing<T, F>(
        &self,
        user_id: &UserId,
        apply: F,
    ) -> Result<Option<T>, SupportThreadPersistenceError>
    where
        T: Send,
        F: FnOnce(&mut SupportThread) -> T + Send,
    {
        let mut state = self.lock().map_err(SupportThreadPersistenceError::query)?;
        Ok(state.support_threads.get_mut(user_id).map(apply))
    }

    async fn list(&self) -> Result<Vec<SupportThread>, SupportThreadPersistenceError> {
        let state = self.lock().map_err(SupportThreadPersistenceError::query)?;
        Ok(state.support_threads.values().cloned().collect())
    }
}

#[async_trait]
impl PendingVerificationRepository for InMemoryStore {
    async fn put(
        &self,
        pending: PendingVerification,
    ) -> Result<(), PendingVerificationPersistenceError> {
        let mut state = self
            .lock()
            .map_err(PendingVerificationPersistenceError::query)?;
        state.pending.insert(pending.email().clone(), pending);
        Ok(())
    }

    async fn redeem<F>(
        &self,
        email: &UserId,
        decide: F,
    ) -> Result<Option<(Redemption, PendingVerification)>, PendingVerificationPersistenceError>
    where
        F: FnOnce(&PendingVerification) -> Redemption + Send,
    {
        let mut state = self
            .lock()
            .map_err(PendingVerificationPersistenceError::query)?;
        let decision = match state.pending.get(email) {
            Some(pending) => decide(pending),
            None => return Ok(None),
        };
        let record = if decision.removes_record() {
            state.pending.remove(email)
        } else {
            state.pending.get(email).cloned()
        };
        Ok(record.map(|record| (decision, record)))
    }
}
