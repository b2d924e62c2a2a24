//! Protected-route gate and navigation.
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    Dashboard,
    Wallets,
    Transactions,
    Budgets,
    Goals,
    Categories,
    Reports,
    Profile,
    Onboarding,
    Assistant,
}

impl Route {
    /// Sections reachable from the main navigation bar, in display order.
    pub const SECTIONS: [Route; 9] = [
        Route::Dashboard,
        Route::Transactions,
        Route::Wallets,
        Route::Budgets,
        Route::Goals,
        Route::Categories,
        Route::Reports,
        Route::Profile,
        Route::Assistant,
    ];

    pub fn is_protected(self) -> bool {
        !matches!(self, Self::Login | Self::Register | Self::ForgotPassword)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Masuk",
            Self::Register => "Daftar",
            Self::ForgotPassword => "Lupa Kata Sandi",
            Self::Dashboard => "Beranda",
            Self::Wallets => "Dompet",
            Self::Transactions => "Transaksi",
            Self::Budgets => "Anggaran",
            Self::Goals => "Target",
            Self::Categories => "Kategori",
            Self::Reports => "Laporan",
            Self::Profile => "Profil",
            Self::Onboarding => "Lengkapi Profil",
            Self::Assistant => "Asisten",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

impl AuthState {
    /// Token presence only: no signature or expiry check.
    pub fn of(session: &Session) -> Self {
        if session.is_authenticated() {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow(Route),
    /// Send the user to login, remembering where they wanted to go.
    Redirect { to: Route, from: Route },
}

pub fn check(session: &Session, requested: Route) -> GateDecision {
    if requested.is_protected() && AuthState::of(session) == AuthState::Unauthenticated {
        GateDecision::Redirect {
            to: Route::Login,
            from: requested,
        }
    } else {
        GateDecision::Allow(requested)
    }
}

#[derive(Debug)]
pub struct Navigator {
    current: Route,
    return_to: Option<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: Route::Login,
            return_to: None,
        }
    }
}

impl Navigator {
    pub fn current(&self) -> Route {
        self.current
    }

    pub fn return_to(&self) -> Option<Route> {
        self.return_to
    }

    /// Runs the gate for `route` and moves to wherever it decides.
    pub fn navigate(&mut self, session: &Session, route: Route) -> Route {
        match check(session, route) {
            GateDecision::Allow(route) => {
                self.current = route;
            }
            GateDecision::Redirect { to, from } => {
                tracing::info!(?from, "unauthenticated, redirecting to login");
                self.return_to = Some(from);
                self.current = to;
            }
        }
        self.current
    }

    /// Re-checks the current route, e.g. after a 401 cleared the session.
    pub fn revalidate(&mut self, session: &Session) -> Route {
        self.navigate(session, self.current)
    }

    /// Destination after a successful login; consumes the remembered route.
    pub fn after_login(&mut self, session: &Session) -> Route {
        let target = self
            .return_to
            .take()
            .filter(|route| route.is_protected())
            .unwrap_or(Route::Dashboard);
        self.navigate(session, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    #[test]
    fn anonymous_user_is_redirected_and_route_is_remembered() {
        let session = Session::in_memory();
        let mut nav = Navigator::default();

        assert_eq!(nav.navigate(&session, Route::Budgets), Route::Login);
        assert_eq!(nav.return_to(), Some(Route::Budgets));
    }

    #[test]
    fn public_routes_are_always_allowed() {
        let session = Session::in_memory();
        assert_eq!(
            check(&session, Route::ForgotPassword),
            GateDecision::Allow(Route::ForgotPassword)
        );
    }

    #[test]
    fn any_token_counts_as_authenticated() {
        let session = Session::in_memory();
        session.sign_in("not-even-a-jwt", false).unwrap();
        assert_eq!(AuthState::of(&session), AuthState::Authenticated);
        assert_eq!(check(&session, Route::Goals), GateDecision::Allow(Route::Goals));
    }

    #[test]
    fn after_login_returns_to_the_requested_route() {
        let session = Session::in_memory();
        let mut nav = Navigator::default();
        nav.navigate(&session, Route::Reports);

        session.sign_in("token", true).unwrap();
        assert_eq!(nav.after_login(&session), Route::Reports);
        assert_eq!(nav.return_to(), None);
        assert_eq!(nav.after_login(&session), Route::Dashboard);
    }

    #[test]
    fn revalidate_after_logout_sends_user_to_login() {
        let session = Session::in_memory();
        session.sign_in("token", false).unwrap();
        let mut nav = Navigator::default();
        nav.navigate(&session, Route::Wallets);

        session.sign_out().unwrap();
        assert_eq!(nav.revalidate(&session), Route::Login);
        assert_eq!(nav.return_to(), Some(Route::Wallets));
    }
}
