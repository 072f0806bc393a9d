//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Only
//! compiled for tests or with the `test-support` feature.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! The crate avoids direct `std::fs` calls, so tests write fixture files
    //! through `cap_std::fs::Dir` as well.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Write bytes to a file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foodshare::test_support::cap_fs::write_file;
    ///
    /// let path = std::env::temp_dir().join("cap-fs-write-example.txt");
    /// write_file(&path, b"secret\n")?;
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod clock {
    //! Controllable clock for ordering-sensitive tests.

    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use mockable::Clock;

    /// Clock that only moves when told to.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        /// A clock starting at a fixed, arbitrary instant.
        pub fn fixed() -> Self {
            let start = match Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).single() {
                Some(start) => start,
                None => panic!("fixture timestamp"),
            };
            Self::new(start)
        }

        pub fn advance_seconds(&self, seconds: i64) {
            *self.lock_clock() += TimeDelta::seconds(seconds);
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }

    /// Clock that advances one second every time it is read.
    ///
    /// Gives each created entity a distinct timestamp so newest-first
    /// orderings are deterministic.
    pub struct SteppingClock(MutableClock);

    impl SteppingClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self(MutableClock::new(start))
        }
    }

    impl Default for SteppingClock {
        fn default() -> Self {
            Self(MutableClock::fixed())
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let now = self.0.utc();
            self.0.advance_seconds(1);
            now
        }
    }
}

pub mod fixtures {
    //! Builders for valid domain values.

    use crate::domain::{
        City, Description, DishContent, DisplayName, DonationContent, EmailAddress, PhoneNumber,
        Quantity, RegionCode, Registration, Role, Title, UserProfile,
    };

    fn valid<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => panic!("fixture value must be valid: {error:?}"),
        }
    }

    pub fn profile(name: &str) -> UserProfile {
        UserProfile {
            display_name: valid(DisplayName::new(name)),
            phone: valid(PhoneNumber::new("+55 11 5555-0100")),
            city: valid(City::new("São Paulo")),
            region: valid(RegionCode::new("SP")),
        }
    }

    pub fn registration(email: &str, name: &str, role: Role) -> Registration {
        valid(Registration::new(
            valid(EmailAddress::new(email)),
            "correct horse battery staple",
            profile(name),
            role.as_str(),
        ))
    }

    pub fn donation_content(title: &str, quantity: &str) -> DonationContent {
        DonationContent {
            title: valid(Title::new(title)),
            description: valid(Description::new("Fresh surplus from today")),
            quantity: valid(Quantity::new(quantity)),
        }
    }

    pub fn dish_content(title: &str) -> DishContent {
        DishContent {
            title: valid(Title::new(title)),
            description: valid(Description::new("Cooked from donated ingredients")),
        }
    }
}
