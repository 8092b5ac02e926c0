//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use coreup_provider::{
    Credentials, Ec2Client, FixedClock, GceClient, Provider, ProviderConfig, create_provider,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub const ACCESS_KEY: &str = "AKIDEXAMPLE";
pub const SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";
pub const GCE_TOKEN: &str = "ya29.test-token";

/// 固定的签名时间
pub fn signing_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2013, 7, 15, 8, 0, 0).unwrap()
}

/// 指向 mock server 的 EC2 客户端（真实 reqwest 传输）
pub fn ec2_client(server_uri: &str, max_retries: u32) -> Ec2Client {
    Ec2Client::builder(Credentials::new(ACCESS_KEY, SECRET_KEY))
        .endpoint(server_uri)
        .clock(Arc::new(FixedClock(signing_time())))
        .max_retries(max_retries)
        .build()
        .unwrap()
}

/// 指向 mock server 的 GCE 客户端，轮询间隔 10ms
pub fn gce_client(server_uri: &str) -> GceClient {
    GceClient::builder("p", GCE_TOKEN)
        .base_url(format!("{server_uri}/compute/v1/projects"))
        .poll_interval(Duration::from_millis(10))
        .max_retries(0)
        .build()
        .unwrap()
}

/// 生成唯一的测试资源名称
pub fn generate_test_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("coreup-test-{}", &uuid.to_string()[..8])
}

/// 测试上下文 - 封装真实凭证创建的 Provider
pub struct TestContext {
    pub provider: Provider,
}

impl TestContext {
    /// 创建 EC2 测试上下文
    pub fn ec2() -> Option<Self> {
        let access_key = env::var("AWS_ACCESS_KEY_ID").ok()?;
        let secret_key = env::var("AWS_SECRET_ACCESS_KEY").ok()?;
        let mut credentials = Credentials::new(access_key, secret_key);
        if let Ok(token) = env::var("AWS_SESSION_TOKEN") {
            credentials = credentials.with_security_token(token);
        }
        let region = env::var("AWS_REGION").ok();

        let provider = create_provider(ProviderConfig::Ec2 {
            credentials,
            region,
            endpoint: None,
            max_retries: 2,
        })
        .ok()?;
        Some(Self { provider })
    }

    /// 创建 GCE 测试上下文
    pub fn gce() -> Option<Self> {
        let project = env::var("GCE_PROJECT").ok()?;
        let access_token = env::var("GCE_ACCESS_TOKEN").ok()?;
        let zone = env::var("GCE_ZONE").ok();

        let provider = create_provider(ProviderConfig::Gce {
            project,
            access_token,
            zone,
            max_retries: 2,
            poll_interval_secs: None,
        })
        .ok()?;
        Some(Self { provider })
    }
}
