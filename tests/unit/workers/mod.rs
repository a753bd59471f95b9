mod resolve_worker_test;
