//! Larger end-to-end programs exercising the interpreter as a whole.

use wisp::interpreter::parse_and_run;

fn eval_to_string(source: &str) -> String {
    parse_and_run(source)
        .expect("program should evaluate")
        .expect("program should produce a value")
        .to_string()
}

#[test]
fn test_insertion_sort() {
    let source = "
(define (insert x xs)
  (cond ((null? xs) (list x))
        ((<= x (car xs)) (cons x xs))
        (else (cons (car xs) (insert x (cdr xs))))))
(define (sort xs)
  (if (null? xs)
      '()
      (insert (car xs) (sort (cdr xs)))))
(sort '(5 2 8 1 9 3))";
    assert_eq!(eval_to_string(source), "(1 2 3 5 8 9)");
}

#[test]
fn test_count_change() {
    let source = "
(define (first-denomination kinds)
  (cond ((= kinds 1) 1)
        ((= kinds 2) 5)
        ((= kinds 3) 10)
        ((= kinds 4) 25)
        ((= kinds 5) 50)))
(define (cc amount kinds)
  (cond ((= amount 0) 1)
        ((or (< amount 0) (= kinds 0)) 0)
        (else (+ (cc amount (- kinds 1))
                 (cc (- amount (first-denomination kinds)) kinds)))))
(define (count-change amount) (cc amount 5))
(count-change 100)";
    assert_eq!(eval_to_string(source), "292");
}

#[test]
fn test_message_passing_account() {
    let source = "
(define (make-account balance)
  (define (withdraw amount)
    (if (>= balance amount)
        (begin (set! balance (- balance amount)) balance)
        \"Insufficient funds\"))
  (define (deposit amount)
    (set! balance (+ balance amount))
    balance)
  (define (dispatch m)
    (cond ((eq? m 'withdraw) withdraw)
          ((eq? m 'deposit) deposit)
          (else (error \"Unknown request\"))))
  dispatch)
(define acc (make-account 100))
((acc 'withdraw) 50)
((acc 'deposit) 40)
((acc 'withdraw) 60)";
    assert_eq!(eval_to_string(source), "30");
}

#[test]
fn test_account_rejects_overdraft() {
    let source = "
(define (make-account balance)
  (lambda (amount)
    (if (>= balance amount)
        (begin (set! balance (- balance amount)) balance)
        \"Insufficient funds\")))
(define acc (make-account 100))
(acc 60)
(acc 60)";
    assert_eq!(eval_to_string(source), "\"Insufficient funds\"");
}

#[test]
fn test_stream_take() {
    let source = "
(define (integers-from n)
  (cons-stream n (integers-from (+ n 1))))
(define (stream-take s n)
  (if (= n 0)
      '()
      (cons (stream-car s) (stream-take (stream-cdr s) (- n 1)))))
(stream-take (integers-from 1) 5)";
    assert_eq!(eval_to_string(source), "(1 2 3 4 5)");
}

#[test]
fn test_sieve_of_eratosthenes() {
    let source = "
(define (divisible? x y) (= (remainder x y) 0))
(define (integers-from n)
  (cons-stream n (integers-from (+ n 1))))
(define (stream-filter pred s)
  (cond ((stream-null? s) the-empty-stream)
        ((pred (stream-car s))
         (cons-stream (stream-car s)
                      (stream-filter pred (stream-cdr s))))
        (else (stream-filter pred (stream-cdr s)))))
(define (sieve s)
  (cons-stream
   (stream-car s)
   (sieve (stream-filter (lambda (x) (not (divisible? x (stream-car s))))
                         (stream-cdr s)))))
(define primes (sieve (integers-from 2)))
(define (stream-take s n)
  (if (= n 0)
      '()
      (cons (stream-car s) (stream-take (stream-cdr s) (- n 1)))))
(stream-take primes 6)";
    assert_eq!(eval_to_string(source), "(2 3 5 7 11 13)");
}

#[test]
fn test_sum_of_squares_via_map_and_apply() {
    assert_eq!(
        eval_to_string("(apply + (map (lambda (x) (* x x)) '(1 2 3 4)))"),
        "30"
    );
}

#[test]
fn test_association_list_as_table() {
    let source = "
(define table '())
(define (put key val)
  (set! table (cons (list key val) table)))
(define (get key)
  (define entry (assoc key table))
  (if entry (cadr entry) 'missing))
(put 'a 1)
(put 'b 2)
(list (get 'b) (get 'a) (get 'zzz))";
    assert_eq!(eval_to_string(source), "(2 1 missing)");
}

#[test]
fn test_higher_order_compose_and_repeat() {
    let source = "
(define (compose f g) (lambda (x) (f (g x))))
(define (repeated f n)
  (if (= n 1)
      f
      (compose f (repeated f (- n 1)))))
(define (inc x) (+ x 1))
((repeated inc 10) 0)";
    assert_eq!(eval_to_string(source), "10");
}

#[test]
fn test_list_reverse_with_accumulator() {
    let source = "
(define (reverse-iter xs acc)
  (if (null? xs)
      acc
      (reverse-iter (cdr xs) (cons (car xs) acc))))
(define (reverse xs) (reverse-iter xs '()))
(reverse '(1 2 3 4))";
    assert_eq!(eval_to_string(source), "(4 3 2 1)");
}

#[test]
fn test_quoted_program_as_data() {
    let source = "
(define prog '(+ 1 2))
(list (car prog) (length prog) (cadr prog))";
    assert_eq!(eval_to_string(source), "(+ 3 1)");
}
