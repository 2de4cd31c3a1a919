// Built-in probe catalog
//
// Every command is read-only. Commands tolerate missing tools themselves where
// a quieter failure reads better; anything else shows up as a recorded failure.

use crate::domain::{Catalog, Probe, Section};

pub const SECTION_SYSTEM: &str = "SYSTEM";
pub const SECTION_AUTH_LOGS: &str = "AUTH LOGS";
pub const SECTION_SSH_KEYS: &str = "SSH KEYS";
pub const SECTION_NETWORK: &str = "NETWORK";
pub const SECTION_PROCESSES: &str = "PROCESSES";
pub const SECTION_PERSISTENCE: &str = "PERSISTENCE";
pub const SECTION_SERVICES: &str = "SERVICES";

/// The catalog `host-triage run` executes
pub fn builtin_catalog() -> Catalog {
    Catalog::new(vec![
        Section::new(
            SECTION_SYSTEM,
            vec![
                Probe::new("date -u"),
                Probe::new("hostname"),
                Probe::new("uname -a"),
                Probe::new("id"),
                Probe::new("uptime"),
                Probe::new("df -hP"),
            ],
        ),
        Section::new(
            SECTION_AUTH_LOGS,
            vec![
                Probe::new("lastb -n 50 2>/dev/null")
                    .capped(52)
                    .with_fallback("no login-failure database on this host"),
                Probe::new("last -n 30").capped(32),
                Probe::new("who -a"),
                Probe::new("journalctl -u ssh -u sshd --no-pager -n 100 2>&1 | tail -n 100")
                    .capped(100),
                Probe::new(
                    "grep -hE 'Failed password|Invalid user|Accepted ' /var/log/auth.log /var/log/secure 2>/dev/null | tail -n 50",
                )
                .capped(50)
                .with_fallback("no auth log entries found"),
            ],
        ),
        Section::new(
            SECTION_SSH_KEYS,
            vec![
                Probe::key_fingerprint(
                    "for f in /etc/ssh/ssh_host_*_key.pub; do [ -f \"$f\" ] && ssh-keygen -lf \"$f\"; done",
                ),
                Probe::key_fingerprint(
                    "for f in /root/.ssh/authorized_keys /home/*/.ssh/authorized_keys; do [ -f \"$f\" ] && ssh-keygen -lf \"$f\"; done",
                )
                .capped(200),
            ],
        ),
        Section::new(
            SECTION_NETWORK,
            vec![
                Probe::new("ss -tulpn"),
                Probe::new("ss -tnp state established").capped(100),
                Probe::new("ip -brief address"),
                Probe::new("ip route"),
                Probe::new("cat /etc/resolv.conf"),
                Probe::new("cat /etc/hosts"),
                Probe::new(
                    "curl -s -m 5 -o /dev/null -w 'http://127.0.0.1/ -> %{http_code}\\n' http://127.0.0.1/",
                ),
                Probe::new("iptables -S 2>&1 | head -n 100").capped(100),
                Probe::new("nft list ruleset 2>&1 | head -n 150").capped(150),
            ],
        ),
        Section::new(
            SECTION_PROCESSES,
            vec![
                Probe::new("ps auxww --sort=-%cpu | head -n 60").capped(60),
                Probe::new("ls -l /proc/*/exe 2>/dev/null | grep -E '\\(deleted\\)' | head -n 50")
                    .capped(50)
                    .with_fallback("no processes running deleted binaries"),
            ],
        ),
        Section::new(
            SECTION_PERSISTENCE,
            vec![
                Probe::new("cat /etc/crontab"),
                Probe::new("ls -la /etc/cron.d /etc/cron.daily /etc/cron.hourly /var/spool/cron/crontabs"),
                Probe::new("crontab -l"),
                Probe::encoded_payload(
                    "grep -rhoE '[A-Za-z0-9+/]{40,}={0,2}' /etc/crontab /etc/cron.d /var/spool/cron 2>/dev/null | head -n 20",
                )
                .capped(40)
                .with_fallback("no encoded payloads in cron files"),
                Probe::new("systemctl list-timers --all --no-pager"),
                Probe::new("ls -la /etc/systemd/system"),
                Probe::new("cat /etc/rc.local"),
                Probe::new("cat /etc/ld.so.preload"),
                Probe::new("find / -xdev -perm -4000 -type f 2>/dev/null | head -n 100").capped(100),
                Probe::new("find /tmp /var/tmp /dev/shm -type f -perm -u+x 2>/dev/null | head -n 50")
                    .capped(50),
            ],
        ),
        Section::new(
            SECTION_SERVICES,
            vec![
                Probe::new("systemctl list-units --type=service --state=running --no-pager"),
                Probe::new("systemctl list-unit-files --state=enabled --no-pager"),
                Probe::new("systemctl --failed --no-pager"),
                Probe::new(
                    "sshd -T 2>&1 | grep -Ei '^(permitrootlogin|passwordauthentication|pubkeyauthentication|port|allowusers) '",
                ),
                Probe::new("grep -v '^#' /etc/sudoers | grep -v '^$'"),
                Probe::new("ls -la /etc/sudoers.d"),
            ],
        ),
    ])
}
