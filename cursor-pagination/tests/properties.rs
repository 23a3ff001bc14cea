//! Property tests for the cursor codec stack.
//!
//! These check the guarantees a client relies on when following links:
//! cursors round-trip, cursors are rejected when anything they were minted
//! for changes, and the host a link is served from does not matter.

use cursor_pagination::codec::CHECKSUM_LEN;
use cursor_pagination::prelude::*;
use proptest::prelude::*;
use url::Url;

// Strategy: sort specification of up to three orders
fn arb_sort() -> impl Strategy<Value = SortSpecification> {
    prop::collection::vec(
        (
            prop::string::string_regex("[a-z][a-z_]{0,7}").unwrap(),
            any::<bool>(),
        ),
        0..3,
    )
    .prop_map(|orders| {
        orders
            .into_iter()
            .map(|(property, descending)| {
                if descending {
                    Order::desc(property)
                } else {
                    Order::asc(property)
                }
            })
            .collect()
    })
}

// Strategy: page request within the default page size bound
fn arb_request() -> impl Strategy<Value = PagingRequest> {
    (0u64..1_000_000, 1u32..=100, arb_sort())
        .prop_map(|(index, size, sort)| PagingRequest::new(index, size, sort))
}

fn arb_path() -> impl Strategy<Value = String> {
    prop::string::string_regex("/[a-z]{1,8}(/[a-z0-9]{1,6}){0,2}").unwrap()
}

fn arb_query() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (
            prop::string::string_regex("[a-z]{1,5}").unwrap(),
            prop::string::string_regex("[a-z0-9 ]{0,6}").unwrap(),
        ),
        0..4,
    )
}

fn identity(path: &str, query: &[(String, String)]) -> RequestIdentity {
    query
        .iter()
        .fold(RequestIdentity::new(path), |id, (k, v)| id.with_param(k, v))
}

fn target(path: &str, query: &[(String, String)]) -> RequestTarget {
    query
        .iter()
        .fold(RequestTarget::new(path), |t, (k, v)| t.with_param(k, v))
}

fn codec() -> IntegrityCheckingCodec<SimplePageCodec> {
    IntegrityCheckingCodec::new(SimplePageCodec)
}

fn assert_integrity_failure(result: std::result::Result<PagingRequest, CursorDecodeError>) {
    match result {
        Err(err) => assert!(err.is_integrity_failure(), "unexpected error: {err}"),
        Ok(request) => panic!("tampered cursor decoded to {request:?}"),
    }
}

proptest! {
    /// Property: decoding an encoded request under the same identity returns it
    #[test]
    fn proptest_round_trip(
        request in arb_request(),
        path in arb_path(),
        query in arb_query()
    ) {
        let id = identity(&path, &query);
        let context = codec().encode(&request, &id);
        prop_assert_eq!(codec().decode(&context, &id).unwrap(), request.clone());

        let keyed = IntegrityCheckingCodec::keyed(SimplePageCodec, "secret");
        let context = keyed.encode(&request, &id);
        prop_assert_eq!(keyed.decode(&context, &id).unwrap(), request);
    }

    /// Property: any change to the identity, page size or sort is detected
    #[test]
    fn proptest_tamper_sensitivity(
        request in arb_request(),
        path in arb_path(),
        query in arb_query()
    ) {
        let id = identity(&path, &query);
        let context = codec().encode(&request, &id);

        // Different path
        assert_integrity_failure(codec().decode(&context, &identity(&format!("{path}/x"), &query)));

        // Added parameter
        let mut added = query.clone();
        added.push(("extra_param".to_string(), "1".to_string()));
        assert_integrity_failure(codec().decode(&context, &identity(&path, &added)));

        if !query.is_empty() {
            // Removed parameter
            assert_integrity_failure(codec().decode(&context, &identity(&path, &query[1..])));

            // Changed value
            let mut changed = query.clone();
            changed[0].1.push('~');
            assert_integrity_failure(codec().decode(&context, &identity(&path, &changed)));
        }

        // Changed page size
        let resized = CursorContext::new(
            context.cursor().map(str::to_string),
            context.page_size() + 1,
            context.sort().clone(),
        );
        assert_integrity_failure(codec().decode(&resized, &id));

        // Changed sort
        let resorted = CursorContext::new(
            context.cursor().map(str::to_string),
            context.page_size(),
            context.sort().clone().and(Order::asc("tiebreak")),
        );
        assert_integrity_failure(codec().decode(&resorted, &id));
    }

    /// Property: altering the wrapped token is detected
    #[test]
    fn proptest_inner_token_tamper_sensitivity(
        request in arb_request(),
        path in arb_path(),
        query in arb_query()
    ) {
        let id = identity(&path, &query);
        let context = codec().encode(&request, &id);
        let cursor = context.cursor().unwrap().to_string();

        let appended = format!("{cursor}0");
        let truncated = cursor[..cursor.len() - 1].to_string();
        let (checksum, _) = cursor.split_at(CHECKSUM_LEN);
        let replaced = format!("{checksum}.{}", request.page_index() + 1);

        for tampered in [appended, truncated, replaced] {
            assert_integrity_failure(codec().decode(&context.with_cursor(Some(tampered)), &id));
        }
    }

    /// Property: scheme, host, port and userinfo do not affect decoding
    #[test]
    fn proptest_host_independence(
        request in arb_request(),
        path in arb_path(),
        query in arb_query(),
        scheme in prop_oneof![Just("http"), Just("https")],
        host in prop::string::string_regex("[a-z]{1,10}\\.(com|org|internal)").unwrap(),
        port in prop::option::of(1024u16..65535),
        userinfo in prop::option::of(prop::string::string_regex("[a-z]{1,6}:[a-z0-9]{1,6}").unwrap())
    ) {
        let binder = PageRequestBinder::default();
        let link = binder.enhance(&request, &target(&path, &query));

        let authority = format!(
            "{}{host}{}",
            userinfo.map(|u| format!("{u}@")).unwrap_or_default(),
            port.map(|p| format!(":{p}")).unwrap_or_default(),
        );
        let url = Url::parse(&format!("{scheme}://{authority}{link}")).unwrap();

        prop_assert_eq!(binder.resolve(&RequestTarget::from_url(&url)).unwrap(), request);
    }

    /// Property: links produced by the binder resolve back to their request
    #[test]
    fn proptest_binder_round_trip(
        request in arb_request(),
        path in arb_path(),
        query in arb_query()
    ) {
        let binder = PageRequestBinder::default();
        let link = binder.enhance(&request, &target(&path, &query));
        let reparsed = RequestTarget::parse(&link.to_string());

        prop_assert_eq!(binder.resolve(&reparsed).unwrap(), request);
    }
}
