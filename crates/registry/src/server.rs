//! 注册服务器状态与请求处理
//!
//! 组装解析器与分发器，处理注册交换的两类请求：
//! 同步的 Realm 注册与异步触发的初始化数据推送

use crate::dispatcher::InfoDispatcher;
use crate::proto::{InitRealmInfo, RegisterRealmRequest, RegisterRealmResponse};
use crate::resolver::RealmResolver;
use realmgate_common::realm::validation::validate_user_id;
use realmgate_common::realm::{RealmError, RealmId, RealmInfoBundle, RealmPath, RealmSet, UserId};
use std::sync::Arc;
use tracing::{debug, info};

/// 注册服务器状态
pub struct RegistryServer {
    /// 路径解析与授权
    pub resolver: Arc<RealmResolver>,
    /// 初始化数据分发
    pub dispatcher: Arc<InfoDispatcher>,
}

impl RegistryServer {
    pub fn new(resolver: Arc<RealmResolver>, dispatcher: Arc<InfoDispatcher>) -> Self {
        Self {
            resolver,
            dispatcher,
        }
    }

    /// 创建可在异步任务中操作服务器的句柄
    pub fn handle(&self) -> RegistryServerHandle {
        RegistryServerHandle {
            resolver: self.resolver.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

/// 注册服务器句柄 - 用于在异步任务中操作服务器
#[derive(Clone)]
pub struct RegistryServerHandle {
    pub resolver: Arc<RealmResolver>,
    pub dispatcher: Arc<InfoDispatcher>,
}

impl RegistryServerHandle {
    /// 处理 Realm 注册请求
    ///
    /// 解析必须在调用方继续订阅连接之前完成（或失败）；
    /// 初始化数据分发在响应产生之后并发执行，不阻塞注册响应。
    pub async fn handle_register(
        &self,
        request: RegisterRealmRequest,
    ) -> Result<RegisterRealmResponse, RealmError> {
        let path = RealmPath::new(request.path);
        let user = UserId::new(request.user_id);

        let realms = self.resolver.resolve(&path, &user).await?;

        info!(
            user = %user,
            path = %path,
            realms = realms.len(),
            "realm registration accepted"
        );

        // 注册响应之外异步推送初始化数据
        self.spawn_dispatch(RealmInfoBundle::new(user, realms.clone()));

        Ok(RegisterRealmResponse {
            realms: realms.iter().map(|r| r.as_str().to_string()).collect(),
        })
    }

    /// 处理初始化数据重推请求（重连场景由网关显式触发）
    ///
    /// Realm 标识来自先前的注册响应，此处不再重新解析路径。
    pub async fn handle_init_info(&self, request: InitRealmInfo) -> Result<(), RealmError> {
        let user = UserId::new(request.user_id);
        validate_user_id(&user)?;

        let realms: RealmSet = request
            .realms
            .into_iter()
            .map(RealmId::new)
            .collect();

        debug!(user = %user, realms = realms.len(), "init realm info requested");
        self.spawn_dispatch(RealmInfoBundle::new(user, realms));

        Ok(())
    }

    fn spawn_dispatch(&self, bundle: RealmInfoBundle) {
        if bundle.realms.is_empty() {
            return;
        }

        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            dispatcher.dispatch(bundle).await;
        });
    }
}
