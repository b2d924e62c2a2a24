//! HTTP client for the budgeting backend.
//!
//! Every authenticated call goes through [`ApiClient::authorized`] (bearer
//! header injection) and [`ApiClient::intercept`] (status normalization). A
//! 401 on an authenticated call clears the session in one place; callers then
//! re-run the route gate.
use std::{sync::Arc, time::Duration};

use api_types::{
    Id,
    assistant::{ChatReply, ChatRequest},
    auth::{
        ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
        ResetTokenResponse, TokenResponse, VerifyOtpRequest,
    },
    budget::{Budget, BudgetNew},
    category::{Category, CategoryNew},
    dashboard::DashboardSummary,
    envelope::{Envelope, ErrorBody, ListEnvelope, PageMeta},
    goal::{Goal, GoalNew},
    profile::{Profile, ProfileNew},
    report::{ReportQuery, ReportSummary},
    transaction::{Transaction, TransactionNew},
    wallet::{Wallet, WalletNew},
};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{ClientError, Result},
    list::{ListQuery, Page},
    report::{Export, ReportPeriod},
    session::Session,
};

#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub api: Duration,
    /// Assistant replies are generated server-side and take much longer.
    pub chat: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            api: Duration::from_secs(15),
            chat: Duration::from_secs(60),
        }
    }
}

/// A REST collection with the usual list/create/update/delete endpoints.
pub trait Resource {
    const PATH: &'static str;
    type Item: DeserializeOwned + Send;
    type Payload: Serialize + Sync;
}

pub struct Wallets;
pub struct Categories;
pub struct Transactions;
pub struct Budgets;
pub struct Goals;

impl Resource for Wallets {
    const PATH: &'static str = "wallets";
    type Item = Wallet;
    type Payload = WalletNew;
}

impl Resource for Categories {
    const PATH: &'static str = "categories";
    type Item = Category;
    type Payload = CategoryNew;
}

impl Resource for Transactions {
    const PATH: &'static str = "transactions";
    type Item = Transaction;
    type Payload = TransactionNew;
}

impl Resource for Budgets {
    const PATH: &'static str = "budgets";
    type Item = Budget;
    type Payload = BudgetNew;
}

impl Resource for Goals {
    const PATH: &'static str = "goals";
    type Item = Goal;
    type Payload = GoalNew;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileStatus {
    Complete(Profile),
    /// The backend has no profile yet; the user goes through onboarding.
    Missing,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    chat_http: reqwest::Client,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeouts: Timeouts, session: Arc<Session>) -> Result<Self> {
        // `Url::join` drops the last path segment unless it ends with '/'.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).map_err(|err| ClientError::BaseUrl(err.to_string()))?;

        Ok(Self {
            base_url,
            http: reqwest::Client::builder().timeout(timeouts.api).build()?,
            chat_http: reqwest::Client::builder().timeout(timeouts.chat).build()?,
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::BaseUrl(err.to_string()))
    }

    fn user_id(&self) -> Result<Id> {
        self.session.user_id().ok_or(ClientError::NoSession)
    }

    /// Attaches the bearer token; fails fast when there is no session.
    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.session.token().ok_or(ClientError::NoSession)?;
        Ok(builder.bearer_auth(token))
    }

    /// Maps a non-2xx response to a [`ClientError`].
    ///
    /// On authenticated calls a 401 means the token is no longer accepted, so
    /// the session is cleared here and nowhere else.
    async fn intercept(&self, res: Response, authenticated: bool) -> Result<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let message = res
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_default();

        let err = match status {
            StatusCode::UNAUTHORIZED if authenticated => {
                tracing::warn!("backend rejected the session token, signing out");
                if let Err(err) = self.session.sign_out() {
                    tracing::error!("failed to clear session after 401: {err}");
                }
                ClientError::Unauthorized
            }
            StatusCode::UNAUTHORIZED
            | StatusCode::BAD_REQUEST
            | StatusCode::CONFLICT
            | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Server { status, message },
        };
        tracing::debug!(%status, "request failed: {err}");
        Err(err)
    }

    async fn data<T: DeserializeOwned>(res: Response) -> Result<T> {
        Ok(res.json::<Envelope<T>>().await?.data)
    }

    async fn public_post<TReq, TResp>(&self, path: &str, body: &TReq) -> Result<TResp>
    where
        TReq: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        let res = self.http.post(self.url(path)?).json(body).send().await?;
        let res = self.intercept(res, false).await?;
        Self::data(res).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let req = self.authorized(self.http.get(self.url(path)?).query(query))?;
        let res = self.intercept(req.send().await?, true).await?;
        Self::data(res).await
    }

    /// Collection GET; keeps `meta` whether it sits beside or inside `data`.
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<(Vec<T>, Option<PageMeta>)> {
        let req = self.authorized(self.http.get(self.url(path)?).query(query))?;
        let res = self.intercept(req.send().await?, true).await?;
        Ok(res.json::<ListEnvelope<T>>().await?.into_parts())
    }

    async fn send_json<TReq: Serialize + ?Sized>(
        &self,
        builder: RequestBuilder,
        body: &TReq,
    ) -> Result<()> {
        let req = self.authorized(builder.json(body))?;
        self.intercept(req.send().await?, true).await?;
        Ok(())
    }

    fn user_query(&self) -> Vec<(String, String)> {
        self.session
            .user_id()
            .map(|id| vec![("user_id".to_string(), id.to_string())])
            .unwrap_or_default()
    }

    // ---- auth ----

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res: TokenResponse = self
            .public_post(
                "auth/login",
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        Ok(res.token)
    }

    pub async fn register(&self, payload: &RegisterRequest) -> Result<String> {
        let res: TokenResponse = self.public_post("auth/register", payload).await?;
        Ok(res.token)
    }

    pub async fn request_otp(&self, email: &str) -> Result<()> {
        let res = self
            .http
            .post(self.url("auth/forgot-password")?)
            .json(&ForgotPasswordRequest {
                email: email.to_string(),
            })
            .send()
            .await?;
        self.intercept(res, false).await?;
        Ok(())
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<String> {
        let res: ResetTokenResponse = self
            .public_post(
                "auth/verify-otp",
                &VerifyOtpRequest {
                    email: email.to_string(),
                    otp: otp.to_string(),
                },
            )
            .await?;
        Ok(res.reset_token)
    }

    pub async fn reset_password(&self, payload: &ResetPasswordRequest) -> Result<()> {
        let res = self
            .http
            .post(self.url("auth/reset-password")?)
            .json(payload)
            .send()
            .await?;
        self.intercept(res, false).await?;
        Ok(())
    }

    // ---- collections ----

    pub async fn list<R: Resource>(&self, query: &ListQuery) -> Result<Page<R::Item>> {
        let mut params = self.user_query();
        params.extend(query.to_params());
        let (items, meta) = self.get_list::<R::Item>(R::PATH, &params).await?;
        Ok(Page::from_response(items, meta, query))
    }

    /// Whole collection, for dropdown options.
    pub async fn list_all<R: Resource>(&self) -> Result<Vec<R::Item>> {
        let (items, _) = self
            .get_list::<R::Item>(R::PATH, &self.user_query())
            .await?;
        Ok(items)
    }

    pub async fn create<R: Resource>(&self, payload: &R::Payload) -> Result<()> {
        let builder = self.http.post(self.url(R::PATH)?);
        self.send_json(builder, payload).await
    }

    pub async fn update<R: Resource>(&self, id: &Id, payload: &R::Payload) -> Result<()> {
        let builder = self.http.put(self.url(&format!("{}/{id}", R::PATH))?);
        self.send_json(builder, payload).await
    }

    pub async fn delete<R: Resource>(&self, id: &Id) -> Result<()> {
        let url = self.url(&format!("{}/{id}", R::PATH))?;
        let req = self.authorized(self.http.delete(url))?;
        self.intercept(req.send().await?, true).await?;
        Ok(())
    }

    pub async fn wallets(&self) -> Result<Vec<Wallet>> {
        self.list_all::<Wallets>().await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.list_all::<Categories>().await
    }

    // ---- dashboard, reports, profile, assistant ----

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        self.get_json("dashboard/summary", &self.user_query()).await
    }

    fn report_query(&self, period: &ReportPeriod) -> Result<ReportQuery> {
        Ok(ReportQuery {
            user_id: self.user_id()?,
            start_date: period.start(),
            end_date: period.end(),
        })
    }

    pub async fn report_summary(&self, period: &ReportPeriod) -> Result<ReportSummary> {
        let query = self.report_query(period)?;
        let req = self.authorized(self.http.get(self.url("reports/summary")?).query(&query))?;
        let res = self.intercept(req.send().await?, true).await?;
        Self::data(res).await
    }

    /// Spreadsheet for `period`, as opaque bytes plus a download filename.
    pub async fn export_report(&self, period: &ReportPeriod) -> Result<Export> {
        let query = self.report_query(period)?;
        let req = self.authorized(self.http.get(self.url("reports/export")?).query(&query))?;
        let res = self.intercept(req.send().await?, true).await?;
        let bytes = res.bytes().await?;
        Ok(Export {
            filename: period.export_filename(),
            bytes: bytes.to_vec(),
        })
    }

    pub async fn profile(&self) -> Result<ProfileStatus> {
        match self.get_json::<Profile>("profile", &self.user_query()).await {
            Ok(profile) => Ok(ProfileStatus::Complete(profile)),
            Err(ClientError::NotFound(message)) => {
                tracing::info!("profile not found ({message}), onboarding required");
                Ok(ProfileStatus::Missing)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn create_profile(&self, payload: &ProfileNew) -> Result<()> {
        let builder = self.http.post(self.url("profile")?);
        self.send_json(builder, payload).await
    }

    pub async fn chat(&self, message: &str) -> Result<String> {
        let body = ChatRequest {
            user_id: self.user_id()?,
            message: message.to_string(),
        };
        let req = self.authorized(self.chat_http.post(self.url("ai/chat")?).json(&body))?;
        let res = self.intercept(req.send().await?, true).await?;
        let reply: ChatReply = Self::data(res).await?;
        Ok(reply.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_its_path_prefix() {
        let api = ApiClient::new(
            "http://localhost:8080/api/v1",
            Timeouts::default(),
            Arc::new(Session::in_memory()),
        )
        .unwrap();
        assert_eq!(
            api.url("/transactions").unwrap().as_str(),
            "http://localhost:8080/api/v1/transactions"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ApiClient::new("not a url", Timeouts::default(), Arc::new(Session::in_memory()))
            .unwrap_err();
        assert!(matches!(err, ClientError::BaseUrl(_)));
    }

    #[tokio::test]
    async fn calls_without_session_fail_before_the_network() {
        // Nothing listens on this port; NoSession must come first.
        let api = ApiClient::new(
            "http://127.0.0.1:9",
            Timeouts::default(),
            Arc::new(Session::in_memory()),
        )
        .unwrap();
        let err = api.wallets().await.unwrap_err();
        assert!(matches!(err, ClientError::NoSession));
    }
}
