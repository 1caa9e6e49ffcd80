//! The `select` primitive (§9 "Selector / race"): a deterministic
//! first-ready-wins operator over a small, fixed set of futures, with
//! ties broken by registration order rather than `tokio::select!`'s
//! default random bias.

use std::future::Future;

/// Outcome of racing two futures; variant order mirrors registration
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Either<A, B> {
    Left(A),
    Right(B),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Either3<A, B, C> {
    First(A),
    Second(B),
    Third(C),
}

/// Races two futures; on a tie, `a` wins (`biased` ordering).
pub async fn select2<A, B>(a: A, b: B) -> Either<A::Output, B::Output>
where
    A: Future,
    B: Future,
{
    tokio::select! {
        biased;
        out = a => Either::Left(out),
        out = b => Either::Right(out),
    }
}

/// Races three futures; on a tie, earlier arguments win.
pub async fn select3<A, B, C>(a: A, b: B, c: C) -> Either3<A::Output, B::Output, C::Output>
where
    A: Future,
    B: Future,
    C: Future,
{
    tokio::select! {
        biased;
        out = a => Either3::First(out),
        out = b => Either3::Second(out),
        out = c => Either3::Third(out),
    }
}
