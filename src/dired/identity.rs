//! uid / gid → 表示名の解決
//!
//! 一度引いた id はプロセスが終わるまで保持する。キャッシュは `Arc` で共有し、
//! 呼び出し箇所ごとに複製しない

use std::collections::HashMap;
use std::sync::Mutex;

/// 所有者・グループ名の解決
pub trait IdentityResolver: Send + Sync {
    fn user_name(&self, uid: u32) -> String;
    fn group_name(&self, gid: u32) -> String;
}

type Lookup = Box<dyn Fn(u32) -> Option<String> + Send + Sync>;

/// id ごとに1件だけ保持する遅延キャッシュ
pub struct IdentityCache {
    users: Mutex<HashMap<u32, String>>,
    groups: Mutex<HashMap<u32, String>>,
    user_lookup: Lookup,
    group_lookup: Lookup,
}

impl IdentityCache {
    /// OS のユーザーデータベースを引くキャッシュ
    pub fn system() -> Self {
        Self::with_lookup(system_user_name, system_group_name)
    }

    /// 任意の解決関数を使うキャッシュ（見つからなければ数値 id を名前にする）
    pub fn with_lookup<U, G>(user_lookup: U, group_lookup: G) -> Self
    where
        U: Fn(u32) -> Option<String> + Send + Sync + 'static,
        G: Fn(u32) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            users: Mutex::new(HashMap::new()),
            groups: Mutex::new(HashMap::new()),
            user_lookup: Box::new(user_lookup),
            group_lookup: Box::new(group_lookup),
        }
    }

    /// キャッシュ済みの id 数（ユーザー, グループ）
    pub fn cached_len(&self) -> (usize, usize) {
        let users = self.users.lock().map(|map| map.len()).unwrap_or(0);
        let groups = self.groups.lock().map(|map| map.len()).unwrap_or(0);
        (users, groups)
    }

    fn resolve(cache: &Mutex<HashMap<u32, String>>, lookup: &Lookup, id: u32) -> String {
        match cache.lock() {
            Ok(mut map) => map
                .entry(id)
                .or_insert_with(|| lookup(id).unwrap_or_else(|| id.to_string()))
                .clone(),
            // 毒化したロックではキャッシュせずに引く
            Err(_) => lookup(id).unwrap_or_else(|| id.to_string()),
        }
    }
}

impl IdentityResolver for IdentityCache {
    fn user_name(&self, uid: u32) -> String {
        Self::resolve(&self.users, &self.user_lookup, uid)
    }

    fn group_name(&self, gid: u32) -> String {
        Self::resolve(&self.groups, &self.group_lookup, gid)
    }
}

impl std::fmt::Debug for IdentityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (users, groups) = self.cached_len();
        f.debug_struct("IdentityCache")
            .field("users", &users)
            .field("groups", &groups)
            .finish()
    }
}

#[cfg(unix)]
fn system_user_name(uid: u32) -> Option<String> {
    uzers::get_user_by_uid(uid).map(|user| user.name().to_string_lossy().into_owned())
}

#[cfg(unix)]
fn system_group_name(gid: u32) -> Option<String> {
    uzers::get_group_by_gid(gid).map(|group| group.name().to_string_lossy().into_owned())
}

#[cfg(not(unix))]
fn system_user_name(_uid: u32) -> Option<String> {
    None
}

#[cfg(not(unix))]
fn system_group_name(_gid: u32) -> Option<String> {
    None
}
