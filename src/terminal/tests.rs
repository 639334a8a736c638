use super::*;

#[test]
fn no_terminal_never_enters_raw_mode() {
    let backend = NoTerminal;
    assert!(!backend.is_terminal());
    let err = backend
        .enter_raw_mode()
        .expect_err("pipes cannot enter raw mode");
    assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    assert!(backend.restore(()).is_ok());
}

#[test]
fn snapshot_handle_debug_shows_saved_state() {
    let handle = RawModeHandle::Snapshot("500:5:bf:8a3b".to_string());
    assert_eq!(
        format!("{handle:?}"),
        "RawModeHandle::Snapshot(\"500:5:bf:8a3b\")"
    );
}

#[test]
fn stdin_terminal_defaults_to_fd_zero() {
    let terminal = StdinTerminal::new(SttyCommand::default());
    assert_eq!(terminal.fd(), STDIN_FD);
    assert_eq!(StdinTerminal::default().fd(), STDIN_FD);
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::fs::{self, File};
    use std::os::fd::AsRawFd;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn dev_null() -> File {
        match File::open("/dev/null") {
            Ok(file) => file,
            Err(err) => panic!("/dev/null should open: {err}"),
        }
    }

    fn unique_log_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("passread-stty-{suffix}-{nanos}.log"))
    }

    /// A `sh -c` stand-in for stty that logs its arguments and answers `--save`.
    fn fake_stty(log: &PathBuf, refuse_raw: bool) -> SttyCommand {
        let refuse = if refuse_raw {
            "if [ \"$1\" = \"-ignbrk\" ]; then echo 'raw flags refused' >&2; exit 4; fi;"
        } else {
            ""
        };
        let script = format!(
            "printf '%s\\n' \"$*\" >> '{}'; {refuse} if [ \"$1\" = \"--save\" ]; then printf '  500:5:bf:8a3b\\n'; fi",
            log.display()
        );
        SttyCommand::new("sh").with_prefix_args(["-c".to_string(), script, "stty".to_string()])
    }

    fn logged_calls(log: &PathBuf) -> Vec<String> {
        let text = fs::read_to_string(log).unwrap_or_default();
        let _ = fs::remove_file(log);
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn is_terminal_falls_back_to_stty_probe() {
        let null = dev_null();
        assert!(!native::is_native_terminal(null.as_raw_fd()));
        assert!(is_terminal(null.as_raw_fd(), &SttyCommand::new("true")));
        assert!(!is_terminal(null.as_raw_fd(), &SttyCommand::new("false")));
        assert!(!is_terminal(
            null.as_raw_fd(),
            &SttyCommand::new("/definitely/not/a/real/passread-stty")
        ));
    }

    #[test]
    fn real_stty_rejects_dev_null() {
        let null = dev_null();
        assert!(!is_terminal(null.as_raw_fd(), &SttyCommand::default()));
    }

    #[test]
    fn stty_fallback_saves_applies_and_replays_state() {
        let log = unique_log_path("roundtrip");
        let stty = fake_stty(&log, false);
        let null = dev_null();

        let handle = enter_raw_mode(null.as_raw_fd(), &stty).expect("enter raw mode");
        match &handle {
            RawModeHandle::Snapshot(state) => assert_eq!(state, "500:5:bf:8a3b"),
            RawModeHandle::Native(_) => panic!("/dev/null must use the stty path"),
        }
        restore(null.as_raw_fd(), handle, &stty).expect("restore");

        assert_eq!(
            logged_calls(&log),
            vec![
                "--save".to_string(),
                RAW_MODE_FLAGS.join(" "),
                "500:5:bf:8a3b".to_string(),
            ]
        );
    }

    #[test]
    fn stty_fallback_reports_flag_failure_with_stderr() {
        let log = unique_log_path("refused");
        let stty = fake_stty(&log, true);
        let null = dev_null();

        let err = enter_raw_mode(null.as_raw_fd(), &stty).expect_err("raw flags should fail");
        assert_eq!(err.to_string(), "sh exited with code 4: raw flags refused");
        assert_eq!(logged_calls(&log).len(), 2);
    }

    #[test]
    fn apply_raw_profile_clears_cooked_flags() {
        // SAFETY: termios is plain data; an all-zero value is valid.
        let mut attrs: libc::termios = unsafe { std::mem::zeroed() };
        attrs.c_iflag = libc::ICRNL | libc::IXON | libc::BRKINT;
        attrs.c_oflag = libc::OPOST;
        attrs.c_lflag = libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN;
        attrs.c_cflag = libc::CS7 | libc::PARENB;

        native::apply_raw_profile(&mut attrs);

        assert_eq!(attrs.c_iflag & (libc::ICRNL | libc::IXON | libc::BRKINT), 0);
        assert_eq!(attrs.c_oflag & libc::OPOST, 0);
        assert_eq!(
            attrs.c_lflag & (libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN),
            0
        );
        assert_eq!(attrs.c_cflag & libc::CSIZE, libc::CS8);
        assert_eq!(attrs.c_cflag & libc::PARENB, 0);
        assert_eq!(attrs.c_cc[libc::VMIN], 1);
        assert_eq!(attrs.c_cc[libc::VTIME], 0);
    }

    #[cfg(target_os = "linux")]
    mod pty {
        use super::*;
        use std::ffi::CStr;
        use std::fs::OpenOptions;
        use std::os::fd::{FromRawFd, OwnedFd};
        use std::os::unix::fs::OpenOptionsExt;

        fn open_pty_pair() -> (OwnedFd, File) {
            // SAFETY: posix_openpt/grantpt/unlockpt/ptsname_r receive a descriptor we just
            // opened and a stack buffer sized for the device path.
            unsafe {
                let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
                assert!(master >= 0, "posix_openpt failed");
                let master = OwnedFd::from_raw_fd(master);
                assert_eq!(libc::grantpt(master.as_raw_fd()), 0);
                assert_eq!(libc::unlockpt(master.as_raw_fd()), 0);
                let mut name = [0 as libc::c_char; 128];
                assert_eq!(
                    libc::ptsname_r(master.as_raw_fd(), name.as_mut_ptr(), name.len()),
                    0
                );
                let path = CStr::from_ptr(name.as_ptr())
                    .to_string_lossy()
                    .into_owned();
                let slave = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .custom_flags(libc::O_NOCTTY)
                    .open(&path)
                    .expect("open pty slave");
                (master, slave)
            }
        }

        #[test]
        fn native_raw_mode_round_trips_on_a_pty() {
            let (_master, slave) = open_pty_pair();
            let fd = slave.as_raw_fd();
            let unused_stty = SttyCommand::new("/definitely/not/a/real/passread-stty");
            assert!(is_terminal(fd, &unused_stty));

            let before = native::read_attrs(fd).expect("read attrs");
            let handle = enter_raw_mode(fd, &unused_stty).expect("enter raw mode");
            assert!(matches!(handle, RawModeHandle::Native(_)));

            let raw = native::read_attrs(fd).expect("read raw attrs");
            assert_eq!(raw.c_lflag & (libc::ECHO | libc::ICANON | libc::ISIG), 0);
            assert_eq!(raw.c_cflag & libc::CSIZE, libc::CS8);

            restore(fd, handle, &unused_stty).expect("restore");
            let after = native::read_attrs(fd).expect("read restored attrs");
            assert_eq!(after.c_lflag, before.c_lflag);
            assert_eq!(after.c_iflag, before.c_iflag);
            assert_eq!(after.c_oflag, before.c_oflag);
            assert_eq!(after.c_cflag, before.c_cflag);
        }

        #[test]
        fn stdin_terminal_backend_drives_any_descriptor() {
            let (_master, slave) = open_pty_pair();
            let terminal = StdinTerminal::with_fd(slave.as_raw_fd(), SttyCommand::default());
            assert!(terminal.is_terminal());
            let handle = terminal.enter_raw_mode().expect("enter raw mode");
            assert!(terminal.restore(handle).is_ok());
        }
    }
}
