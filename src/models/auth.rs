use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 令牌中携带的用户角色。令牌由外部认证服务签发，本服务只验证。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Promoter,
    Admin,
    Finance,
}

impl UserRole {
    /// 佣金与提现的状态流转只允许 admin/finance 角色执行
    pub fn can_manage_ledger(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Finance)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Promoter => write!(f, "promoter"),
            UserRole::Admin => write!(f, "admin"),
            UserRole::Finance => write!(f, "finance"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "promoter" => Ok(UserRole::Promoter),
            "admin" => Ok(UserRole::Admin),
            "finance" => Ok(UserRole::Finance),
            _ => Err(()),
        }
    }
}

/// 认证中间件解析令牌后放入请求扩展的当前用户
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_parse_round_trip() {
        for role in [UserRole::Promoter, UserRole::Admin, UserRole::Finance] {
            assert_eq!(UserRole::from_str(&role.to_string()), Ok(role));
        }
        assert!(UserRole::from_str("superuser").is_err());
    }

    #[test]
    fn test_only_admin_roles_manage_ledger() {
        assert!(!UserRole::Promoter.can_manage_ledger());
        assert!(UserRole::Admin.can_manage_ledger());
        assert!(UserRole::Finance.can_manage_ledger());
    }
}
