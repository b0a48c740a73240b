use chrono_tz::Tz;
use std::path::PathBuf;

/// 引擎配置 - 请款审批引擎的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (也会读取工作目录下的 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录，两张表所在位置 |
/// | REQUESTS_FILE | requests.json | 请款单表 |
/// | STAFF_FILE | staff.json | 人员表 |
/// | FINANCE_LEAD | (空) | 财务主管 (复审) 的完整姓名 |
/// | ADMINS | (空) | 管理员姓名，逗号分隔 |
/// | PROJECT_OWNERS | (空) | 可选为专案执行人的名单；空 = 任何在职人员 |
/// | DEFAULT_CREDENTIAL | 0000 | 未设密码时接受的预设密码 |
/// | BUSINESS_TIMEZONE | Asia/Taipei | 业务时区 |
/// | FALLBACK_ENCODINGS | big5,gb18030 | UTF-8 失败后依序尝试的编码 |
/// | STORE_LOCK_RETRIES | 3 | 取得表锁的重试次数 |
/// | STORE_LOCK_RETRY_MS | 50 | 重试间隔 (毫秒) |
/// | TRANSFER_FEE | 30 | 匯款(扣手續費) 扣除的手续费 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (空) | 日志目录；空 = 仅输出到终端 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/expense FINANCE_LEAD="Wish 宋威績" ADMINS="Amy,Ken" ./desk
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    pub requests_file: String,
    pub staff_file: String,
    /// 财务主管 (唯一的复审签核人)
    pub finance_lead: Option<String>,
    /// 管理员 (精确姓名)
    pub admins: Vec<String>,
    /// 专案执行人白名单
    pub project_owners: Vec<String>,
    pub default_credential: String,
    pub business_timezone: Tz,
    /// 编码标签 (encoding_rs label)
    pub fallback_encodings: Vec<String>,
    pub store_lock_retries: u32,
    pub store_lock_retry_ms: u64,
    /// 手续费 (最小货币单位)
    pub transfer_fee: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or(defaults.work_dir),
            requests_file: std::env::var("REQUESTS_FILE").unwrap_or(defaults.requests_file),
            staff_file: std::env::var("STAFF_FILE").unwrap_or(defaults.staff_file),
            finance_lead: std::env::var("FINANCE_LEAD")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            admins: std::env::var("ADMINS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            project_owners: std::env::var("PROJECT_OWNERS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            default_credential: std::env::var("DEFAULT_CREDENTIAL")
                .unwrap_or(defaults.default_credential),
            business_timezone: std::env::var("BUSINESS_TIMEZONE")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.business_timezone),
            fallback_encodings: std::env::var("FALLBACK_ENCODINGS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.fallback_encodings),
            store_lock_retries: std::env::var("STORE_LOCK_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.store_lock_retries),
            store_lock_retry_ms: std::env::var("STORE_LOCK_RETRY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.store_lock_retry_ms),
            transfer_fee: std::env::var("TRANSFER_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.transfer_fee),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.trim().is_empty()),
        }
    }

    /// 默认配置 + 指定工作目录 (不读取环境变量)
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Self::default()
        }
    }

    pub fn requests_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.requests_file)
    }

    pub fn staff_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.staff_file)
    }

    /// 是否管理员 (精确比对)
    pub fn is_admin(&self, name: &str) -> bool {
        self.admins.iter().any(|admin| admin == name)
    }

    /// 是否财务主管 (精确比对)
    pub fn is_finance_lead(&self, name: &str) -> bool {
        self.finance_lead.as_deref() == Some(name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: "./data".into(),
            requests_file: "requests.json".into(),
            staff_file: "staff.json".into(),
            finance_lead: None,
            admins: Vec::new(),
            project_owners: Vec::new(),
            default_credential: "0000".into(),
            business_timezone: chrono_tz::Asia::Taipei,
            fallback_encodings: vec!["big5".into(), "gb18030".into()],
            store_lock_retries: 3,
            store_lock_retry_ms: 50,
            transfer_fee: 30,
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

/// 逗号分隔列表 (去空白、去空项)
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::with_work_dir("/tmp/desk");
        assert_eq!(config.requests_path(), PathBuf::from("/tmp/desk/requests.json"));
        assert_eq!(config.staff_path(), PathBuf::from("/tmp/desk/staff.json"));
        assert_eq!(config.default_credential, "0000");
        assert_eq!(config.business_timezone, chrono_tz::Asia::Taipei);
        assert_eq!(config.fallback_encodings, vec!["big5", "gb18030"]);
        assert_eq!(config.transfer_fee, 30);
        assert!(config.finance_lead.is_none());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" Amy , Ken,,"), vec!["Amy", "Ken"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_role_lookup_is_exact() {
        let mut config = Config::with_work_dir("/tmp/desk");
        config.admins = vec!["Amy Chen".into()];
        config.finance_lead = Some("Wish 宋威績".into());

        assert!(config.is_admin("Amy Chen"));
        assert!(!config.is_admin("Amy"));
        assert!(config.is_finance_lead("Wish 宋威績"));
        assert!(!config.is_finance_lead("Wish"));
    }
}
