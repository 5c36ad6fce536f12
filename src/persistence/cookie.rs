//! Cookie-backed flag store
//!
//! Mirrors the flag as `name=true; Path=/; Expires=<now + 30 days>`. Removal
//! rewrites the cookie with an expiry in the past, which is how browsers drop it.

use std::cell::RefCell;
use std::rc::Rc;

use ::cookie::Cookie;
use time::{Duration, OffsetDateTime};

use super::FlagStore;
use crate::error::StorageError;

/// How long the mirrored cookie lives
pub const COOKIE_LIFETIME_DAYS: i64 = 30;

/// Something that behaves like `document.cookie`
pub trait CookieJar {
    /// All live cookies as `a=1; b=2`
    fn header(&self) -> Result<String, StorageError>;
    /// Apply one `Set-Cookie`-style line
    fn set_cookie(&mut self, line: &str) -> Result<(), StorageError>;
    /// Current time as the jar sees it
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Flag store writing through a cookie jar
#[derive(Debug, Clone)]
pub struct CookieStore<J> {
    jar: J,
    lifetime: Duration,
}

impl<J: CookieJar> CookieStore<J> {
    pub fn new(jar: J) -> Self {
        Self {
            jar,
            lifetime: Duration::days(COOKIE_LIFETIME_DAYS),
        }
    }

    pub fn jar(&self) -> &J {
        &self.jar
    }

    fn write(&mut self, key: &str, value: &str, expires: OffsetDateTime) -> Result<(), StorageError> {
        let cookie = Cookie::build((key.to_string(), value.to_string()))
            .path("/")
            .expires(expires)
            .build();
        self.jar.set_cookie(&cookie.to_string())
    }
}

impl<J: CookieJar> FlagStore for CookieStore<J> {
    fn name(&self) -> &'static str {
        "cookie"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let header = self.jar.header()?;
        for cookie in Cookie::split_parse(header.as_str()) {
            match cookie {
                Ok(c) if c.name() == key => return Ok(Some(c.value().to_string())),
                Ok(_) => {}
                // Someone else's malformed cookie is not our problem
                Err(e) => log::debug!("Skipping unparsable cookie: {}", e),
            }
        }
        Ok(None)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let expires = self.jar.now() + self.lifetime;
        self.write(key, value, expires)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.write(key, "", OffsetDateTime::UNIX_EPOCH)
    }
}

/// In-memory cookie jar honouring expiry
///
/// Clones share the same cookies. The clock can be shifted to simulate time
/// passing between page loads.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    cookies: Rc<RefCell<Vec<Cookie<'static>>>>,
    clock_offset: Rc<RefCell<Duration>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the jar's clock forward
    pub fn advance_clock(&self, by: Duration) {
        *self.clock_offset.borrow_mut() += by;
    }

    /// Expiry of a stored cookie
    pub fn expires(&self, name: &str) -> Option<OffsetDateTime> {
        self.cookies
            .borrow()
            .iter()
            .find(|c| c.name() == name)
            .and_then(|c| c.expires_datetime())
    }

    fn is_live(cookie: &Cookie<'_>, now: OffsetDateTime) -> bool {
        cookie.expires_datetime().is_none_or(|at| at > now)
    }
}

impl CookieJar for MemoryCookieJar {
    fn header(&self) -> Result<String, StorageError> {
        let now = self.now();
        let header = self
            .cookies
            .borrow()
            .iter()
            .filter(|c| Self::is_live(c, now))
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect::<Vec<_>>()
            .join("; ");
        Ok(header)
    }

    fn set_cookie(&mut self, line: &str) -> Result<(), StorageError> {
        let cookie = Cookie::parse(line.to_string())?;
        let now = self.now();
        let mut cookies = self.cookies.borrow_mut();
        cookies.retain(|c| c.name() != cookie.name());
        if Self::is_live(&cookie, now) {
            cookies.push(cookie);
        }
        Ok(())
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc() + *self.clock_offset.borrow()
    }
}
